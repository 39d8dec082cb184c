//! Fetch hooks
//!
//! A [`Hooks`] registry holds one optional callback per [`HookPoint`]. During
//! a fetch each point looks up its slot at the moment it is reached, so a hook
//! attached while a fetch is in flight still runs if its point has not passed.
//! Callbacks are cloned out of the registry before they run, which lets a hook
//! attach or clear other hooks.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::dataset::{Dataset, Feature, FeatureSet};
use crate::error::{DataSourceError, Result};

pub type UnitHook = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;
pub type DatasetHook = Arc<dyn Fn(&Dataset) -> anyhow::Result<()> + Send + Sync>;
pub type FeaturesHook = Arc<dyn Fn(&[Feature]) -> anyhow::Result<()> + Send + Sync>;
pub type FeatureSetHook = Arc<dyn for<'a> Fn(FeatureSet<'a>) -> anyhow::Result<()> + Send + Sync>;

/// Points in the fetch sequence where a hook can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeGetData,
    BeforeStrategy,
    AfterStrategy,
    BeforeSupplementary,
    BeforeCaching,
    AfterCaching,
    AfterSupplementary,
    AfterGetData,
}

impl HookPoint {
    /// Every point, in the order a fetch reaches them
    pub const ORDER: [HookPoint; 8] = [
        HookPoint::BeforeGetData,
        HookPoint::BeforeStrategy,
        HookPoint::AfterStrategy,
        HookPoint::BeforeSupplementary,
        HookPoint::BeforeCaching,
        HookPoint::AfterCaching,
        HookPoint::AfterSupplementary,
        HookPoint::AfterGetData,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HookPoint::BeforeGetData => "beforeGetData",
            HookPoint::BeforeStrategy => "beforeStrategy",
            HookPoint::AfterStrategy => "afterStrategy",
            HookPoint::BeforeSupplementary => "beforeSupplementary",
            HookPoint::BeforeCaching => "beforeCaching",
            HookPoint::AfterCaching => "afterCaching",
            HookPoint::AfterSupplementary => "afterSupplementary",
            HookPoint::AfterGetData => "afterGetData",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Default)]
struct HookSlots {
    before_get_data: Option<UnitHook>,
    before_strategy: Option<UnitHook>,
    after_strategy: Option<DatasetHook>,
    before_supplementary: Option<FeaturesHook>,
    before_caching: Option<FeatureSetHook>,
    after_caching: Option<FeatureSetHook>,
    after_supplementary: Option<DatasetHook>,
    after_get_data: Option<DatasetHook>,
}

impl HookSlots {
    fn is_set(&self, point: HookPoint) -> bool {
        match point {
            HookPoint::BeforeGetData => self.before_get_data.is_some(),
            HookPoint::BeforeStrategy => self.before_strategy.is_some(),
            HookPoint::AfterStrategy => self.after_strategy.is_some(),
            HookPoint::BeforeSupplementary => self.before_supplementary.is_some(),
            HookPoint::BeforeCaching => self.before_caching.is_some(),
            HookPoint::AfterCaching => self.after_caching.is_some(),
            HookPoint::AfterSupplementary => self.after_supplementary.is_some(),
            HookPoint::AfterGetData => self.after_get_data.is_some(),
        }
    }

    fn clear(&mut self, point: HookPoint) {
        match point {
            HookPoint::BeforeGetData => self.before_get_data = None,
            HookPoint::BeforeStrategy => self.before_strategy = None,
            HookPoint::AfterStrategy => self.after_strategy = None,
            HookPoint::BeforeSupplementary => self.before_supplementary = None,
            HookPoint::BeforeCaching => self.before_caching = None,
            HookPoint::AfterCaching => self.after_caching = None,
            HookPoint::AfterSupplementary => self.after_supplementary = None,
            HookPoint::AfterGetData => self.after_get_data = None,
        }
    }
}

/// Shared registry of fetch hooks
///
/// Cloning a `Hooks` yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct Hooks {
    slots: Arc<RwLock<HookSlots>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs first, before anything is handed out
    pub fn set_before_get_data<F>(&self, hook: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().before_get_data = Some(Arc::new(hook));
    }

    pub fn set_before_strategy<F>(&self, hook: F)
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().before_strategy = Some(Arc::new(hook));
    }

    /// Receives the whole dataset once the strategy is known
    pub fn set_after_strategy<F>(&self, hook: F)
    where
        F: Fn(&Dataset) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().after_strategy = Some(Arc::new(hook));
    }

    /// Receives the features before supplementary data is filled in
    pub fn set_before_supplementary<F>(&self, hook: F)
    where
        F: Fn(&[Feature]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().before_supplementary = Some(Arc::new(hook));
    }

    pub fn set_before_caching<F>(&self, hook: F)
    where
        F: for<'a> Fn(FeatureSet<'a>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().before_caching = Some(Arc::new(hook));
    }

    pub fn set_after_caching<F>(&self, hook: F)
    where
        F: for<'a> Fn(FeatureSet<'a>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().after_caching = Some(Arc::new(hook));
    }

    pub fn set_after_supplementary<F>(&self, hook: F)
    where
        F: Fn(&Dataset) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().after_supplementary = Some(Arc::new(hook));
    }

    /// Runs last, just before the fetch resolves
    pub fn set_after_get_data<F>(&self, hook: F)
    where
        F: Fn(&Dataset) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.slots.write().after_get_data = Some(Arc::new(hook));
    }

    pub fn clear(&self, point: HookPoint) {
        self.slots.write().clear(point);
    }

    pub fn clear_all(&self) {
        *self.slots.write() = HookSlots::default();
    }

    pub fn is_set(&self, point: HookPoint) -> bool {
        self.slots.read().is_set(point)
    }

    /// Attached points, in invocation order
    pub fn attached(&self) -> Vec<HookPoint> {
        let slots = self.slots.read();
        HookPoint::ORDER
            .into_iter()
            .filter(|point| slots.is_set(*point))
            .collect()
    }

    /// Run every attached hook against `dataset` in [`HookPoint::ORDER`]
    ///
    /// Stops at the first failing hook.
    pub(crate) fn run(&self, dataset: &Dataset) -> Result<()> {
        let features = dataset.feature_set();

        self.invoke(
            HookPoint::BeforeGetData,
            |s| s.before_get_data.clone(),
            |h: UnitHook| h(),
        )?;
        self.invoke(
            HookPoint::BeforeStrategy,
            |s| s.before_strategy.clone(),
            |h: UnitHook| h(),
        )?;
        self.invoke(
            HookPoint::AfterStrategy,
            |s| s.after_strategy.clone(),
            |h: DatasetHook| h(dataset),
        )?;
        self.invoke(
            HookPoint::BeforeSupplementary,
            |s| s.before_supplementary.clone(),
            |h: FeaturesHook| h(dataset.features.as_slice()),
        )?;
        self.invoke(
            HookPoint::BeforeCaching,
            |s| s.before_caching.clone(),
            |h: FeatureSetHook| h(features),
        )?;
        self.invoke(
            HookPoint::AfterCaching,
            |s| s.after_caching.clone(),
            |h: FeatureSetHook| h(features),
        )?;
        self.invoke(
            HookPoint::AfterSupplementary,
            |s| s.after_supplementary.clone(),
            |h: DatasetHook| h(dataset),
        )?;
        self.invoke(
            HookPoint::AfterGetData,
            |s| s.after_get_data.clone(),
            |h: DatasetHook| h(dataset),
        )?;

        Ok(())
    }

    fn invoke<H>(
        &self,
        point: HookPoint,
        slot: impl FnOnce(&HookSlots) -> Option<H>,
        call: impl FnOnce(H) -> anyhow::Result<()>,
    ) -> Result<()> {
        // The read guard is released before the hook runs
        let hook = slot(&self.slots.read());
        let Some(hook) = hook else {
            return Ok(());
        };

        tracing::debug!(hook = %point, "invoking hook");
        call(hook).map_err(|source| DataSourceError::Hook { point, source })
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("attached", &self.attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn dataset() -> Arc<Dataset> {
        Dataset::demo().unwrap()
    }

    #[test]
    fn test_no_hooks_is_ok() {
        let hooks = Hooks::new();
        assert!(hooks.run(&dataset()).is_ok());
        assert!(hooks.attached().is_empty());
    }

    #[test]
    fn test_attached_in_order() {
        let hooks = Hooks::new();
        hooks.set_after_get_data(|_| Ok(()));
        hooks.set_before_get_data(|| Ok(()));
        hooks.set_before_caching(|_| Ok(()));

        assert_eq!(
            hooks.attached(),
            vec![
                HookPoint::BeforeGetData,
                HookPoint::BeforeCaching,
                HookPoint::AfterGetData
            ]
        );
    }

    #[test]
    fn test_clear_removes_single_hook() {
        let hooks = Hooks::new();
        hooks.set_before_strategy(|| Ok(()));
        hooks.set_after_strategy(|_| Ok(()));

        hooks.clear(HookPoint::BeforeStrategy);
        assert!(!hooks.is_set(HookPoint::BeforeStrategy));
        assert!(hooks.is_set(HookPoint::AfterStrategy));

        hooks.clear_all();
        assert!(hooks.attached().is_empty());
    }

    #[test]
    fn test_hook_can_attach_another_hook() {
        let hooks = Hooks::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let registry = hooks.clone();
        let sink = Arc::clone(&calls);
        hooks.set_before_get_data(move || {
            let sink = Arc::clone(&sink);
            registry.set_after_get_data(move |_| {
                sink.lock().push("afterGetData");
                Ok(())
            });
            Ok(())
        });

        hooks.run(&dataset()).unwrap();
        assert_eq!(*calls.lock(), vec!["afterGetData"]);
    }

    #[test]
    fn test_failing_hook_names_its_point() {
        let hooks = Hooks::new();
        hooks.set_after_caching(|_| Err(anyhow::anyhow!("cache unavailable")));

        let err = hooks.run(&dataset()).unwrap_err();
        assert_eq!(err.hook_point(), Some(HookPoint::AfterCaching));
        assert_eq!(err.to_string(), "afterCaching hook failed: cache unavailable");
    }

    #[test]
    fn test_debug_lists_attached_points() {
        let hooks = Hooks::new();
        hooks.set_after_supplementary(|_| Ok(()));
        assert_eq!(
            format!("{hooks:?}"),
            "Hooks { attached: [AfterSupplementary] }"
        );
    }
}
