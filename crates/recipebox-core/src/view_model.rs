//! Recipe list view-model
//!
//! The recipe list and the current selection are owned by a single task.
//! Callers talk to it through a cloneable [`ViewModelHandle`]:
//! - Commands arrive over a bounded mailbox and are applied one at a time
//! - Remote calls run in spawned tasks and post their completions back to
//!   the owning task, so no mutation of the list ever races another
//! - Every state change is published as a [`ViewState`] snapshot on a
//!   `watch` channel
//!
//! Deletes are optimistic: the recipe leaves the list before the store is
//! asked to delete it, and a failed remote delete is only logged.

use crate::config::RecipeBoxConfig;
use crate::error::CoreError;
use crate::repository::RecipeRepository;
use recipebox_model::{Recipe, RecipeDraft, RecipeId};
use recipebox_store::{ImageSource, RemoteStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Observable view-model state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Recipes in store order
    pub recipes: Vec<Recipe>,
    /// Recipe chosen for the detail view
    pub selected: Option<Recipe>,
}

impl ViewState {
    /// Look up a listed recipe
    #[must_use]
    pub fn recipe(&self, id: &RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| &r.id == id)
    }

    /// True when there is nothing to list
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Ids of listed recipes, in order
    #[must_use]
    pub fn ids(&self) -> Vec<RecipeId> {
        self.recipes.iter().map(|r| r.id.clone()).collect()
    }
}

/// Commands accepted by the view-model
#[derive(Debug)]
enum Command {
    /// Refresh the list from the store
    Load,
    /// Create a recipe, then refresh
    Create {
        draft: RecipeDraft,
        image: Option<ImageSource>,
    },
    /// Remove locally, then delete remotely
    Delete(RecipeId),
    /// Set the selection
    Select(RecipeId),
    /// Notify once no remote call is in flight
    Settled(oneshot::Sender<()>),
    /// Stop the view-model
    Shutdown,
}

/// Command plus acknowledgement of its local effect
#[derive(Debug)]
struct Envelope {
    command: Command,
    ack: oneshot::Sender<()>,
}

/// Remote call outcomes posted back to the owning task
#[derive(Debug)]
enum Completion {
    Loaded {
        generation: u64,
        recipes: Vec<Recipe>,
    },
    Created(Result<Recipe, StoreError>),
    Deleted {
        id: RecipeId,
        result: Result<(), StoreError>,
    },
}

/// Handle to a running [`RecipeListViewModel`]
///
/// Each call resolves once the command's local effect is applied; remote
/// work continues in the background.
#[derive(Debug, Clone)]
pub struct ViewModelHandle {
    commands: mpsc::Sender<Envelope>,
    state: watch::Receiver<ViewState>,
}

impl ViewModelHandle {
    /// Refresh the list from the store
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if the view-model has stopped
    pub async fn on_load(&self) -> Result<(), CoreError> {
        self.request(Command::Load).await
    }

    /// Submit a new recipe
    ///
    /// The list refreshes once the store has answered; a failed save is
    /// not reported.
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if the view-model has stopped
    pub async fn on_create(
        &self,
        name: impl Into<String>,
        ingredients: impl Into<String>,
        instructions: impl Into<String>,
        image: Option<ImageSource>,
    ) -> Result<(), CoreError> {
        let draft = RecipeDraft::new(name, ingredients, instructions);
        self.request(Command::Create { draft, image }).await
    }

    /// Delete a recipe
    ///
    /// Resolves after the recipe has left the published list.
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if the view-model has stopped
    pub async fn on_delete_request(&self, id: impl Into<RecipeId>) -> Result<(), CoreError> {
        self.request(Command::Delete(id.into())).await
    }

    /// Select a recipe for the detail view
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if the view-model has stopped
    pub async fn on_select(&self, id: impl Into<RecipeId>) -> Result<(), CoreError> {
        self.request(Command::Select(id.into())).await
    }

    /// Wait until no remote call issued by the view-model is in flight
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if the view-model stops first
    pub async fn settled(&self) -> Result<(), CoreError> {
        let (tx, rx) = oneshot::channel();
        self.request(Command::Settled(tx)).await?;
        rx.await.map_err(|_| CoreError::ViewModelClosed)
    }

    /// Stop the view-model
    ///
    /// Completions still in flight are dropped.
    ///
    /// # Errors
    /// - `CoreError::ViewModelClosed` if it had already stopped
    pub async fn shutdown(&self) -> Result<(), CoreError> {
        self.request(Command::Shutdown).await
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    async fn request(&self, command: Command) -> Result<(), CoreError> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(Envelope { command, ack })
            .await
            .map_err(|_| CoreError::ViewModelClosed)?;
        done.await.map_err(|_| CoreError::ViewModelClosed)
    }
}

/// Single-owner recipe list state
#[derive(Debug)]
pub struct RecipeListViewModel<S> {
    repository: Arc<RecipeRepository<S>>,
    recipes: Vec<Recipe>,
    selected: Option<Recipe>,
    state: watch::Sender<ViewState>,
    completions: mpsc::UnboundedSender<Completion>,
    /// Generation of the most recently issued load
    issued_generation: u64,
    /// Generation of the most recently applied load
    applied_generation: u64,
    /// Remote deletes not yet answered, by id
    pending_deletes: HashMap<RecipeId, usize>,
    /// Confirmed deletes, by the newest load generation issued when the store
    /// answered; loads up to that generation may have read the document
    confirmed_deletes: HashMap<RecipeId, u64>,
    in_flight: usize,
    settle_waiters: Vec<oneshot::Sender<()>>,
}

impl<S: RemoteStore + 'static> RecipeListViewModel<S> {
    /// Start the view-model on the current tokio runtime
    ///
    /// # Errors
    /// - `CoreError::Config` if `config` is invalid
    pub fn spawn(store: Arc<S>, config: &RecipeBoxConfig) -> Result<ViewModelHandle, CoreError> {
        config.validate()?;
        let repository = RecipeRepository::new(store, config);
        Ok(Self::spawn_with_repository(repository, config.mailbox_capacity))
    }

    /// Start the view-model over an existing repository
    ///
    /// A `mailbox_capacity` of zero is raised to one.
    #[must_use]
    pub fn spawn_with_repository(
        repository: RecipeRepository<S>,
        mailbox_capacity: usize,
    ) -> ViewModelHandle {
        let (command_tx, command_rx) = mpsc::channel(mailbox_capacity.max(1));
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ViewState::default());

        let view_model = Self {
            repository: Arc::new(repository),
            recipes: Vec::new(),
            selected: None,
            state: state_tx,
            completions: completion_tx,
            issued_generation: 0,
            applied_generation: 0,
            pending_deletes: HashMap::new(),
            confirmed_deletes: HashMap::new(),
            in_flight: 0,
            settle_waiters: Vec::new(),
        };
        tokio::spawn(view_model.run(command_rx, completion_rx));

        ViewModelHandle {
            commands: command_tx,
            state: state_rx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Envelope>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        tracing::debug!(collection = %self.repository.collection(), "view-model started");
        let mut accepting = true;

        loop {
            tokio::select! {
                envelope = commands.recv(), if accepting => match envelope {
                    Some(Envelope { command: Command::Shutdown, ack }) => {
                        let _ = ack.send(());
                        break;
                    }
                    Some(Envelope { command, ack }) => {
                        self.handle(command);
                        let _ = ack.send(());
                    }
                    None => accepting = false,
                },
                Some(completion) = completions.recv() => self.complete(completion),
            }

            if !accepting && self.in_flight == 0 {
                break;
            }
        }

        tracing::debug!(in_flight = self.in_flight, "view-model stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Load => self.load(),
            Command::Create { draft, image } => self.create(draft, image),
            Command::Delete(id) => self.delete(id),
            Command::Select(id) => self.select(&id),
            Command::Settled(waiter) => {
                if self.in_flight == 0 {
                    let _ = waiter.send(());
                } else {
                    self.settle_waiters.push(waiter);
                }
            }
            // handled by the run loop
            Command::Shutdown => {}
        }
    }

    fn load(&mut self) {
        self.issued_generation += 1;
        let generation = self.issued_generation;
        let repository = Arc::clone(&self.repository);
        self.issue(async move {
            let recipes = repository.list_all().await;
            Completion::Loaded {
                generation,
                recipes,
            }
        });
    }

    fn create(&mut self, draft: RecipeDraft, image: Option<ImageSource>) {
        let repository = Arc::clone(&self.repository);
        self.issue(async move { Completion::Created(repository.create(draft, image).await) });
    }

    fn delete(&mut self, id: RecipeId) {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        if self.recipes.len() == before {
            tracing::debug!(recipe_id = %id, "deleting recipe not in list");
        } else {
            self.publish();
        }

        *self.pending_deletes.entry(id.clone()).or_insert(0) += 1;
        let repository = Arc::clone(&self.repository);
        self.issue(async move {
            let result = repository.delete(&id).await;
            Completion::Deleted { id, result }
        });
    }

    fn select(&mut self, id: &RecipeId) {
        self.selected = self.recipes.iter().find(|r| &r.id == id).cloned();
        if self.selected.is_none() {
            tracing::warn!(recipe_id = %id, "selected recipe not in list");
        }
        self.publish();
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded {
                generation,
                recipes,
            } => {
                if generation > self.applied_generation {
                    self.applied_generation = generation;
                    self.recipes = recipes
                        .into_iter()
                        .filter(|r| !self.is_deleted(&r.id, generation))
                        .collect();
                    // a load issued after the store answered has seen the delete
                    self.confirmed_deletes.retain(|_, seen| *seen >= generation);
                    self.publish();
                } else {
                    tracing::debug!(
                        generation,
                        applied = self.applied_generation,
                        "discarding stale load"
                    );
                }
            }
            Completion::Created(result) => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "error saving recipe");
                }
                self.load();
            }
            Completion::Deleted { id, result } => {
                if let Some(count) = self.pending_deletes.get_mut(&id) {
                    *count -= 1;
                    if *count == 0 {
                        self.pending_deletes.remove(&id);
                    }
                }
                match result {
                    Ok(()) => {
                        if self.issued_generation > self.applied_generation {
                            self.confirmed_deletes.insert(id, self.issued_generation);
                        }
                    }
                    Err(e) => {
                        tracing::error!(recipe_id = %id, error = %e, "error deleting recipe");
                    }
                }
            }
        }

        self.in_flight -= 1;
        if self.in_flight == 0 {
            for waiter in self.settle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    fn is_deleted(&self, id: &RecipeId, generation: u64) -> bool {
        self.pending_deletes.contains_key(id)
            || self
                .confirmed_deletes
                .get(id)
                .is_some_and(|seen| generation <= *seen)
    }

    fn issue<F>(&mut self, call: F)
    where
        F: std::future::Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let _ = completions.send(call.await);
        });
    }

    fn publish(&self) {
        self.state.send_replace(ViewState {
            recipes: self.recipes.clone(),
            selected: self.selected.clone(),
        });
    }
}
