use crate::catalog::DeviceCatalog;
use crate::options::{AUTO_LABEL, OptionList};

/// Builds the output-device list governed by a sink selection.
///
/// Holds no snapshot: every resolution re-queries the catalog.
///
/// # Example
/// ```
/// use ac_core::cascade::CascadeResolver;
/// use ac_core::catalog::StaticCatalog;
///
/// let catalog = StaticCatalog::default().with_sink("sdl2", ["Speakers"]);
/// let resolver = CascadeResolver::new(&catalog);
/// let devices = resolver.resolve_device_options("sdl2");
/// assert_eq!(devices.labels(), ["auto", "Speakers"]);
/// ```
#[derive(Clone, Copy)]
pub struct CascadeResolver<'a> {
    catalog: &'a dyn DeviceCatalog,
}

impl<'a> CascadeResolver<'a> {
    #[must_use]
    pub fn new(catalog: &'a dyn DeviceCatalog) -> Self {
        Self { catalog }
    }

    /// `["auto"]` followed by the catalog's devices for `sink_id`, unsorted.
    ///
    /// `sink_id` is taken as already resolved from the sink list; an unknown
    /// one simply yields the "auto" entry alone.
    #[must_use]
    pub fn resolve_device_options(&self, sink_id: &str) -> OptionList {
        let devices = self.catalog.list_devices_for_sink(sink_id);
        log::debug!("Sink {sink_id:?} : {} périphériques", devices.len());
        OptionList::with_leading(AUTO_LABEL, devices)
    }

    /// The catalog this resolver queries.
    #[must_use]
    pub fn catalog(&self) -> &'a dyn DeviceCatalog {
        self.catalog
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::catalog::StaticCatalog;

    #[test]
    fn unknown_sink_yields_only_auto() {
        let catalog = StaticCatalog::default().with_sink("cubeb", ["Speakers"]);
        let resolver = CascadeResolver::new(&catalog);
        assert_eq!(resolver.resolve_device_options("pulse").labels(), ["auto"]);
    }

    #[test]
    fn catalog_order_is_kept() {
        let catalog = StaticCatalog::default().with_sink("cubeb", ["Zeta", "Alpha", "Mid"]);
        let resolver = CascadeResolver::new(&catalog);
        assert_eq!(
            resolver.resolve_device_options("cubeb").labels(),
            ["auto", "Zeta", "Alpha", "Mid"]
        );
    }

    struct CountingCatalog {
        calls: Cell<usize>,
    }

    impl DeviceCatalog for CountingCatalog {
        fn list_sinks(&self) -> Vec<String> {
            vec!["s".into()]
        }

        fn list_devices_for_sink(&self, _sink_id: &str) -> Vec<String> {
            self.calls.set(self.calls.get() + 1);
            vec![format!("dev{}", self.calls.get())]
        }

        fn list_input_devices(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn every_resolution_requeries_catalog() {
        let catalog = CountingCatalog {
            calls: Cell::new(0),
        };
        let resolver = CascadeResolver::new(&catalog);
        assert_eq!(resolver.resolve_device_options("s").get(1), Some("dev1"));
        assert_eq!(resolver.resolve_device_options("s").get(1), Some("dev2"));
        assert_eq!(catalog.calls.get(), 2);
    }
}
