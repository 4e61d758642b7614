//! Filter trait and registry.
//!
//! A host discovers filters through a [`FilterRegistry`] it owns and drives
//! them through the object-safe [`ImageFilter`] trait. There is no global
//! instance; build one and pass it where it's needed.
//!
//! # Example
//!
//! ```rust
//! use lapsharp_core::Raster;
//! use lapsharp_ops::filter::{register_builtin, FilterRegistry};
//! use lapsharp_ops::progress::NoProgress;
//!
//! let mut registry: FilterRegistry<u8> = FilterRegistry::new();
//! register_builtin(&mut registry).unwrap();
//!
//! let filter = registry.get("PyramidalSharpening").unwrap();
//! let src: Raster<u8> = Raster::filled(8, 8, &[100, 120, 140]);
//! let mut dst = src.clone();
//! let roi = src.bounds();
//! filter
//!     .process(&src, &mut dst, &filter.default_config(), roi, &mut NoProgress)
//!     .unwrap();
//! assert_eq!(dst, src);
//! ```

use crate::config::FilterConfig;
use crate::progress::Progress;
use crate::sharpen::PyramidalSharpening;
use lapsharp_core::{Error, Raster, Rect, Result, Sample};
use std::collections::BTreeMap;
use tracing::debug;

/// Stable identifier and display label of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId {
    /// Registry key.
    pub id: &'static str,
    /// Human-readable name.
    pub label: &'static str,
}

impl std::fmt::Display for FilterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label)
    }
}

/// What a filter supports in a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Usable as a painting operation.
    pub painting: bool,
    /// Can render a preview.
    pub preview: bool,
    /// Can render incrementally while painting.
    pub incremental_painting: bool,
    /// Usable as a non-destructive adjustment layer.
    pub adjustment_layers: bool,
    /// Works on any channel layout without color-space knowledge.
    pub color_space_independent: bool,
}

/// An image filter over native samples `T`.
pub trait ImageFilter<T: Sample>: Send + Sync {
    /// Identifier and label.
    fn id(&self) -> FilterId;

    /// Host capabilities.
    fn capabilities(&self) -> Capabilities;

    /// Configuration with every property at its default.
    fn default_config(&self) -> FilterConfig;

    /// Filters `roi` of `src` into the same region of `dst`.
    ///
    /// `dst` outside `roi` is left as it was. On error `dst` isn't written.
    fn process(
        &self,
        src: &Raster<T>,
        dst: &mut Raster<T>,
        config: &FilterConfig,
        roi: Rect,
        progress: &mut dyn Progress,
    ) -> Result<()>;
}

/// Filters keyed by [`FilterId::id`].
pub struct FilterRegistry<T: Sample> {
    filters: BTreeMap<&'static str, Box<dyn ImageFilter<T>>>,
}

impl<T: Sample> FilterRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            filters: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the built-in filters.
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        register_builtin(&mut registry)?;
        Ok(registry)
    }

    /// Adds a filter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if a filter with the same id is registered.
    pub fn register(&mut self, filter: Box<dyn ImageFilter<T>>) -> Result<()> {
        let id = filter.id();
        if self.filters.contains_key(id.id) {
            return Err(Error::invalid_parameter(
                "filter",
                format!("'{}' is already registered", id.id),
            ));
        }
        debug!(id = id.id, "register filter");
        self.filters.insert(id.id, filter);
        Ok(())
    }

    /// Filter registered under `id`.
    pub fn get(&self, id: &str) -> Option<&dyn ImageFilter<T>> {
        self.filters.get(id).map(|f| f.as_ref())
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Looks up the filter named by `config.name` and runs it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if no filter has that id, otherwise
    /// whatever the filter returns.
    pub fn process(
        &self,
        src: &Raster<T>,
        dst: &mut Raster<T>,
        config: &FilterConfig,
        roi: Rect,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let filter = self.get(&config.name).ok_or_else(|| {
            Error::invalid_parameter("filter", format!("no filter named '{}'", config.name))
        })?;
        filter.process(src, dst, config, roi, progress)
    }
}

impl<T: Sample> Default for FilterRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> std::fmt::Debug for FilterRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registers every built-in filter.
pub fn register_builtin<T: Sample>(registry: &mut FilterRegistry<T>) -> Result<()> {
    registry.register(Box::new(PyramidalSharpening::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    struct Invert;

    impl ImageFilter<u8> for Invert {
        fn id(&self) -> FilterId {
            FilterId {
                id: "Invert",
                label: "Invert",
            }
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::default()
        }

        fn default_config(&self) -> FilterConfig {
            FilterConfig::new("Invert", 1)
        }

        fn process(
            &self,
            src: &Raster<u8>,
            dst: &mut Raster<u8>,
            _config: &FilterConfig,
            roi: Rect,
            _progress: &mut dyn Progress,
        ) -> Result<()> {
            for (x, y) in roi.iter_coords() {
                for c in 0..src.channels() {
                    dst.set_sample(x, y, c, 255 - src.sample(x, y, c));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = FilterRegistry::<u8>::with_builtin().unwrap();
        registry.register(Box::new(Invert)).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["Invert", "PyramidalSharpening"]);
        assert!(registry.get("Blur").is_none());
        let caps = registry.get("PyramidalSharpening").unwrap().capabilities();
        assert!(caps.adjustment_layers);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry: FilterRegistry<u16> = FilterRegistry::new();
        assert!(registry.is_empty());
        register_builtin(&mut registry).unwrap();
        let err = register_builtin(&mut registry).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_process_by_name() {
        let mut registry: FilterRegistry<u8> = FilterRegistry::new();
        registry.register(Box::new(Invert)).unwrap();
        let src: Raster<u8> = Raster::filled(2, 2, &[10]);
        let mut dst = src.clone();
        registry
            .process(&src, &mut dst, &FilterConfig::new("Invert", 1), src.bounds(), &mut NoProgress)
            .unwrap();
        assert_eq!(dst.pixel(1, 1), &[245]);

        let err = registry
            .process(&src, &mut dst, &FilterConfig::new("Nope", 1), src.bounds(), &mut NoProgress)
            .unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }

    #[test]
    fn test_id_display() {
        let id = FilterId {
            id: "PyramidalSharpening",
            label: "Pyramidal sharpening",
        };
        assert_eq!(id.to_string(), "Pyramidal sharpening");
    }
}
