use indexmap::IndexMap;

use crate::error::GeoExactError;
use crate::function::{operations, types, CallError, CallResult, Datum, FunctionContext};
use crate::storage::{CopyStrategy, ExactStrategy, ReferenceStrategy};

/// Signature shared by every entry point.
pub type EntryPoint = fn(&FunctionContext, &[Datum]) -> CallResult<Datum>;

/// Ordered table of entry points by name.
#[derive(Clone, Default)]
pub struct FunctionCatalog {
    entries: IndexMap<&'static str, EntryPoint>,
}

impl std::fmt::Debug for FunctionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

/// Registers `name`, `name_ref` and `name_exact` for each listed operation.
macro_rules! register_operations {
    ($catalog:ident; $($name:ident),+ $(,)?) => {
        $(
            $catalog.register(stringify!($name), operations::$name::<CopyStrategy>);
            $catalog.register(
                concat!(stringify!($name), "_ref"),
                operations::$name::<ReferenceStrategy>,
            );
            $catalog.register(
                concat!(stringify!($name), "_exact"),
                operations::$name::<ExactStrategy>,
            );
        )+
    };
}

macro_rules! register_types {
    ($catalog:ident; $($name:ident),+ $(,)?) => {
        $($catalog.register(stringify!($name), types::$name);)+
    };
}

impl FunctionCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation in all three strategies, followed by the type surface.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        register_operations!(catalog;
            area,
            area3d,
            has_plane,
            pointing_up,
            intersects,
            distance,
            convexhull,
            triangulate2d,
            make_solid,
            force_z_up,
            copy,
            intersection,
            minkowski_sum,
            extrude,
            round,
            offset_polygon,
            buffer,
            collection_extract,
        );
        register_types!(catalog;
            geometry_in,
            geometry_from_text,
            geometry_out,
            ref_in,
            ref_from_text,
            ref_out,
            exact_in,
            exact_from_text,
            exact_out,
            ref_from_geom,
            geom_from_ref,
            exact_from_geom,
            geom_from_exact,
        );
        catalog
    }

    /// Add or replace an entry point.
    pub fn register(&mut self, name: &'static str, entry: EntryPoint) -> Option<EntryPoint> {
        self.entries.insert(name, entry)
    }

    pub fn get(&self, name: &str) -> Option<EntryPoint> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up `name` and invoke it.
    pub fn call(&self, ctx: &FunctionContext, name: &str, args: &[Datum]) -> CallResult<Datum> {
        let entry = self.get(name).ok_or_else(|| {
            CallError::new(
                name,
                GeoExactError::InvalidArgument(format!("no function named {name}")),
            )
        })?;
        entry(ctx, args)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
