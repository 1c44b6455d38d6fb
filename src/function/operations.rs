//! Algorithm entry points. Each is registered once per persistence strategy.

use crate::algorithm::{self, Area};
use crate::error::GeoExactError;
use crate::exact::Geometry;
use crate::function::call::sql_function;

sql_function!(area(_ctx; g: Geometry) -> Float8 { g.geometry.area() });

sql_function!(area3d(_ctx; g: Geometry) -> Float8 { g.geometry.area3d() });

sql_function!(has_plane(_ctx; g: Geometry) -> Bool { algorithm::has_plane(&g.geometry) });

sql_function!(pointing_up(_ctx; g: Geometry) -> Bool { algorithm::pointing_up(&g.geometry) });

sql_function!(intersects(_ctx; a: Geometry, b: Geometry) -> Bool {
    Ok(algorithm::intersects(&a.geometry, &b.geometry))
});

sql_function!(distance(_ctx; a: Geometry, b: Geometry) -> Float8 {
    Ok(algorithm::distance(&a.geometry, &b.geometry))
});

sql_function!(convexhull(_ctx; g: Geometry) -> Geometry {
    Ok(algorithm::convex_hull(&g.geometry))
});

sql_function!(triangulate2d(_ctx; g: Geometry) -> Geometry {
    algorithm::triangulate_2d(&g.geometry).map(Geometry::from)
});

sql_function!(make_solid(_ctx; g: Geometry) -> Geometry { algorithm::make_solid(&g.geometry) });

sql_function!(force_z_up(_ctx; g: Geometry) -> Geometry { algorithm::force_z_up(&g.geometry) });

sql_function!(copy(_ctx; g: Geometry) -> Geometry { Ok(algorithm::copy(&g.geometry)) });

sql_function!(intersection(_ctx; a: Geometry, b: Geometry) -> Geometry {
    algorithm::intersection(&a.geometry, &b.geometry)
});

sql_function!(minkowski_sum(_ctx; a: Geometry, b: Geometry) -> Geometry {
    algorithm::minkowski_sum(&a.geometry, &b.geometry)
});

sql_function!(extrude(_ctx; g: Geometry, dx: Float8, dy: Float8, dz: Float8) -> Geometry {
    algorithm::extrude(&g.geometry, dx, dy, dz)
});

sql_function!(round(_ctx; g: Geometry, scale: Int4) -> Geometry {
    algorithm::round(&g.geometry, scale)
});

sql_function!(
    /// Offset by `distance`, approximating arcs with the configured segment count.
    offset_polygon(ctx; g: Geometry, distance: Float8) -> Geometry {
        let segments = i32::try_from(ctx.config().offset_segments)
            .map_err(|_| GeoExactError::Overflow)?;
        algorithm::offset_polygon(&g.geometry, distance, segments)
    }
);

sql_function!(buffer(_ctx; g: Geometry, radius: Float8, segments: Int4) -> Geometry {
    algorithm::buffer(&g.geometry, radius, segments)
});

sql_function!(collection_extract(_ctx; g: Geometry, kind: Int4) -> Geometry {
    algorithm::collection_extract(&g.geometry, kind)
});
