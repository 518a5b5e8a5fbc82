//! Tool service
//!
//! [`UiToolService`] ties the registry, patch engine, validator and state
//! store together behind the tool operations exposed to the agent.

use crate::config::ServiceConfig;
use crate::error::ToolError;
use crate::types::{
    HistoryResponse, ModifyRequest, ModifyResult, UiChanged, UpdateStateRequest,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uitree_core::{
    ComponentCategory, ComponentDetails, ComponentRegistry, ComponentSummary, Patch, PatchEngine,
    TreeValidator, UiTree, ValidationReport,
};
use uitree_store::{ChangeLog, StateStore, UiState, DEFAULT_TRIGGER};

/// Tool operations over a shared registry and state store
///
/// Cheap to clone; clones share the store and the notification channel.
#[derive(Clone)]
pub struct UiToolService {
    registry: Arc<ComponentRegistry>,
    store: Arc<dyn StateStore>,
    config: ServiceConfig,
    notifier: broadcast::Sender<UiChanged>,
}

impl std::fmt::Debug for UiToolService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiToolService")
            .field("components", &self.registry.len())
            .field("config", &self.config)
            .field("subscribers", &self.notifier.receiver_count())
            .finish_non_exhaustive()
    }
}

impl UiToolService {
    /// Create service
    #[must_use]
    pub fn new(
        registry: Arc<ComponentRegistry>,
        store: Arc<dyn StateStore>,
        config: ServiceConfig,
    ) -> Self {
        let (notifier, _) = broadcast::channel(config.notification_capacity.max(1));
        Self {
            registry,
            store,
            config,
            notifier,
        }
    }

    /// Create service over the default component catalog
    #[must_use]
    pub fn with_default_registry(store: Arc<dyn StateStore>, config: ServiceConfig) -> Self {
        Self::new(Arc::new(ComponentRegistry::with_defaults()), store, config)
    }

    /// Get registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Get state store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Receive a `ui/changed` event for every successful `modify_ui`
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UiChanged> {
        self.notifier.subscribe()
    }

    /// Initialize every configured seed subject
    ///
    /// Subjects that already have state are left as they are.
    ///
    /// # Errors
    /// The first storage failure.
    pub async fn seed(&self) -> Result<Vec<UiState>, ToolError> {
        let mut seeded = Vec::with_capacity(self.config.seed_subjects.len());
        for subject in &self.config.seed_subjects {
            let state = self.store.initialize(subject).await?;
            info!(subject = %subject, version = state.version, "subject ready");
            seeded.push(state);
        }
        Ok(seeded)
    }

    /// Current tree of a subject
    ///
    /// # Errors
    /// [`ToolError::NotFound`] if the subject has no state.
    pub async fn get_current_tree(&self, user_id: &str) -> Result<UiTree, ToolError> {
        Ok(self.get_state(user_id).await?.tree)
    }

    /// Full state record of a subject
    ///
    /// # Errors
    /// [`ToolError::NotFound`] if the subject has no state.
    pub async fn get_state(&self, user_id: &str) -> Result<UiState, ToolError> {
        self.store
            .load(user_id)
            .await?
            .ok_or_else(|| ToolError::user_not_found(user_id))
    }

    /// Registry entry of a component
    ///
    /// # Errors
    /// [`ToolError::NotFound`] for unregistered names.
    pub fn get_component_details(&self, name: &str) -> Result<ComponentDetails, ToolError> {
        self.registry
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::component_not_found(name))
    }

    /// Registered components, optionally restricted to a category
    #[must_use]
    pub fn list_components(&self, category: Option<ComponentCategory>) -> Vec<ComponentSummary> {
        match category {
            Some(category) => self.registry.by_category(category),
            None => self.registry.all(),
        }
    }

    /// Validate a raw tree; never fails
    #[must_use]
    pub fn validate_tree(&self, tree: &serde_json::Value) -> ValidationReport {
        TreeValidator::new(&self.registry).validate(tree)
    }

    /// Apply one patch to a subject's tree and persist the result
    ///
    /// # Arguments
    /// * `request` - Operation, path, payload and optional expected version
    ///
    /// # Returns
    /// The new tree, its description and the persisted version.
    ///
    /// # Errors
    /// - [`ToolError::NotFound`] if the subject has no state
    /// - [`ToolError::VersionConflict`] if `expected_version` is stale or a
    ///   concurrent write wins
    /// - [`ToolError::Patch`] if the patch cannot be applied
    /// - [`ToolError::InvalidTree`] if post-patch validation is enabled and fails
    pub async fn modify_ui(&self, request: ModifyRequest) -> Result<ModifyResult, ToolError> {
        let ModifyRequest {
            user_id,
            operation,
            path,
            component,
            props,
            expected_version,
            triggered_by,
        } = request;

        let current = self.get_state(&user_id).await?;
        let base_version = match expected_version {
            Some(expected) if expected != current.version => {
                warn!(subject = %user_id, expected, actual = current.version, "stale modify rejected");
                return Err(ToolError::VersionConflict {
                    expected,
                    actual: current.version,
                });
            }
            Some(expected) => expected,
            None => current.version,
        };

        let patch = Patch::from_parts(operation, &path, component, props)?;
        let outcome = PatchEngine::new(&self.registry).apply(&current.tree, &patch)?;

        if self.config.validate_after_patch {
            let report = TreeValidator::new(&self.registry).validate_tree(&outcome.tree);
            if !report.valid {
                debug!(subject = %user_id, issues = report.errors.len(), "patched tree invalid");
                return Err(ToolError::InvalidTree(report));
            }
        }

        let saved = self
            .store
            .save(&user_id, base_version, outcome.tree.clone())
            .await?;

        let entry = ChangeLog::new(outcome.description.clone(), current.tree, outcome.tree.clone())
            .with_version(saved.version)
            .with_triggered_by(triggered_by.unwrap_or_else(|| DEFAULT_TRIGGER.to_string()));
        if let Err(e) = self.store.record_change(&user_id, entry).await {
            warn!(subject = %user_id, error = %e, "failed to record change");
        }

        let result = ModifyResult {
            success: true,
            new_tree: outcome.tree,
            description: outcome.description,
            version: saved.version,
        };
        info!(subject = %user_id, version = saved.version, description = %result.description, "ui modified");

        let event = UiChanged {
            user_id,
            result: result.clone(),
        };
        if self.notifier.send(event).is_err() {
            debug!("no ui/changed subscribers");
        }

        Ok(result)
    }

    /// Replace a subject's tree wholesale, guarded by version
    ///
    /// # Errors
    /// [`ToolError::NotFound`] or [`ToolError::VersionConflict`].
    pub async fn update_state(&self, request: UpdateStateRequest) -> Result<UiState, ToolError> {
        let state = self
            .store
            .save(&request.user_id, request.version, request.tree)
            .await?;
        Ok(state)
    }

    /// Reset a subject to the default tree
    ///
    /// # Errors
    /// Storage failures.
    pub async fn reset_state(&self, user_id: &str) -> Result<UiState, ToolError> {
        Ok(self.store.reset(user_id).await?)
    }

    /// Newest-first change history of a subject
    ///
    /// `limit` defaults to the configured history page size.
    ///
    /// # Errors
    /// Storage failures.
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<HistoryResponse, ToolError> {
        let limit = limit.unwrap_or(self.config.history_limit);
        let changes = self.store.history(user_id, limit).await?;
        Ok(HistoryResponse {
            user_id: user_id.to_string(),
            total: changes.len(),
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uitree_core::OperationKind;
    use uitree_store::MemoryStateStore;

    async fn service(config: ServiceConfig) -> UiToolService {
        let store = Arc::new(MemoryStateStore::new());
        store.initialize("alice").await.unwrap();
        UiToolService::with_default_registry(store, config)
    }

    #[tokio::test]
    async fn stale_expected_version_fails_before_patching() {
        let service = service(ServiceConfig::new()).await;
        let request = ModifyRequest::new("alice", OperationKind::Remove, "$.children[0]")
            .with_expected_version(7);

        let err = service.modify_ui(request).await.unwrap_err();
        assert!(matches!(
            err,
            ToolError::VersionConflict {
                expected: 7,
                actual: 1
            }
        ));
        assert_eq!(service.get_state("alice").await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn post_patch_validation_rejects_bad_children() {
        let service = service(ServiceConfig::new().with_validate_after_patch(true)).await;
        let request = ModifyRequest::new("alice", OperationKind::Replace, "$.children[0]")
            .with_component(UiTree::new("Text").with_children(vec![UiTree::new("Badge")]));

        let err = service.modify_ui(request).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidTree(_)));
        assert_eq!(
            err.suggestion().as_deref(),
            Some("Remove children or use a container component")
        );
        assert_eq!(service.get_state("alice").await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn missing_payload_is_validation_error() {
        let service = service(ServiceConfig::new()).await;
        let err = service
            .modify_ui(ModifyRequest::new("alice", OperationKind::Add, "$"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to apply add: component is required");
    }

    #[test]
    fn list_components_by_category() {
        let service = UiToolService::with_default_registry(
            Arc::new(MemoryStateStore::new()),
            ServiceConfig::new(),
        );
        let todo = service.list_components(Some(ComponentCategory::Todo));
        assert!(todo.iter().all(|c| c.category == ComponentCategory::Todo));
        assert!(todo.iter().any(|c| c.name == "TaskList"));
        assert_eq!(service.list_components(None).len(), service.registry().len());

        let report = service.validate_tree(&json!({"component": "Nope"}));
        assert!(!report.valid);
    }
}
