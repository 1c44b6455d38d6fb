//! Text input and output of the three geometry types, and casts between them.
//!
//! `geometry` values are Model A and parse as simple feature EWKT. `ref_geometry` and
//! `exact_geometry` values are exact and accept rational coordinates such as `1/3`.

use log::debug;

use crate::error::GeoExactError;
use crate::exact::GeometryTrait;
use crate::function::call::BoundaryStrategy;
use crate::function::{CallError, CallResult, Datum, FunctionContext};
use crate::io::wkt::{read_exact, read_simple};
use crate::storage::{CopyStrategy, ExactStrategy, ReferenceStrategy, SerializedGeometry};

/// The single argument of a type-surface function, or null.
fn single<'a>(name: &str, args: &'a [Datum]) -> CallResult<Option<&'a Datum>> {
    match args {
        [Datum::Null] => Ok(None),
        [datum] => Ok(Some(datum)),
        _ => Err(CallError::new(
            name,
            GeoExactError::InvalidArgument(format!(
                "{name} takes 1 argument, got {}",
                args.len()
            )),
        )),
    }
}

fn text_argument<'a>(name: &str, args: &'a [Datum]) -> CallResult<Option<&'a str>> {
    let Some(datum) = single(name, args)? else {
        return Ok(None);
    };
    datum.as_text().map(Some).ok_or_else(|| {
        CallError::new(
            name,
            GeoExactError::InvalidArgument(format!("expected text, got {}", datum.type_name())),
        )
    })
}

fn token_argument<'a, S: BoundaryStrategy>(
    name: &str,
    args: &'a [Datum],
) -> CallResult<Option<&'a S::Token>> {
    let Some(datum) = single(name, args)? else {
        return Ok(None);
    };
    S::token(datum).map(Some).ok_or_else(|| {
        CallError::new(
            name,
            GeoExactError::InvalidArgument(format!(
                "expected a geometry, got {}",
                datum.type_name()
            )),
        )
    })
}

fn parse_simple(name: &str, ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    let Some(text) = text_argument(name, args)? else {
        return Ok(Datum::Null);
    };
    read_simple(text, ctx.config().max_nesting_depth)
        .and_then(|simple| SerializedGeometry::from_simple(&simple))
        .map(Datum::Geometry)
        .map_err(|e| CallError::new(name, e))
}

fn parse_exact<S: BoundaryStrategy>(
    name: &str,
    ctx: &FunctionContext,
    args: &[Datum],
) -> CallResult<Datum> {
    let Some(text) = text_argument(name, args)? else {
        return Ok(Datum::Null);
    };
    read_exact(text, ctx.config().max_nesting_depth)
        .and_then(|prepared| S::select(ctx).encode(prepared))
        .map(S::wrap)
        .map_err(|e| CallError::new(name, e))
}

/// Exact notation for the types that can hold it.
const EXACT_TEXT: i32 = -1;

fn output<S: BoundaryStrategy>(
    name: &str,
    ctx: &FunctionContext,
    args: &[Datum],
    precision: i32,
) -> CallResult<Datum> {
    let Some(token) = token_argument::<S>(name, args)? else {
        return Ok(Datum::Null);
    };
    S::select(ctx)
        .as_text(token, precision)
        .map(Datum::Text)
        .map_err(|e| CallError::new(name, e))
}

/// Decode with one strategy and encode with another.
fn cast<Src: BoundaryStrategy, Dst: BoundaryStrategy>(
    name: &str,
    ctx: &FunctionContext,
    args: &[Datum],
) -> CallResult<Datum> {
    let Some(token) = token_argument::<Src>(name, args)? else {
        return Ok(Datum::Null);
    };
    let prepared = Src::select(ctx)
        .decode(token)
        .map_err(|e| CallError::new(name, e))?;
    debug!("{name}: casting {}", prepared.geometry.geometry_kind().name());
    Dst::select(ctx)
        .encode(prepared.as_ref().clone())
        .map(Dst::wrap)
        .map_err(|e| CallError::new(name, e))
}

pub fn geometry_in(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_simple("geometry_in", ctx, args)
}

pub fn geometry_from_text(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_simple("geometry_from_text", ctx, args)
}

pub fn geometry_out(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    output::<CopyStrategy>("geometry_out", ctx, args, ctx.config().output_precision)
}

pub fn ref_in(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_exact::<ReferenceStrategy>("ref_in", ctx, args)
}

pub fn ref_from_text(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_exact::<ReferenceStrategy>("ref_from_text", ctx, args)
}

/// Exact text of a referenced geometry, or `-deleted-` once its scope is gone.
pub fn ref_out(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    output::<ReferenceStrategy>("ref_out", ctx, args, EXACT_TEXT)
}

pub fn exact_in(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_exact::<ExactStrategy>("exact_in", ctx, args)
}

pub fn exact_from_text(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    parse_exact::<ExactStrategy>("exact_from_text", ctx, args)
}

/// Exact text, which `exact_in` reads back to the same value.
pub fn exact_out(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    output::<ExactStrategy>("exact_out", ctx, args, EXACT_TEXT)
}

pub fn ref_from_geom(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    cast::<CopyStrategy, ReferenceStrategy>("ref_from_geom", ctx, args)
}

pub fn geom_from_ref(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    cast::<ReferenceStrategy, CopyStrategy>("geom_from_ref", ctx, args)
}

pub fn exact_from_geom(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    cast::<CopyStrategy, ExactStrategy>("exact_from_geom", ctx, args)
}

pub fn geom_from_exact(ctx: &FunctionContext, args: &[Datum]) -> CallResult<Datum> {
    cast::<ExactStrategy, CopyStrategy>("geom_from_exact", ctx, args)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::config::BridgeConfig;
    use crate::storage::{ScopeId, ScopeTree};

    fn context() -> (FunctionContext, Arc<ScopeTree>) {
        let tree = Arc::new(ScopeTree::new());
        let ctx = FunctionContext::new(BridgeConfig::default(), tree.clone());
        (ctx, tree)
    }

    fn text(datum: Datum) -> String {
        datum.as_text().unwrap().to_string()
    }

    #[test]
    fn geometry_text_round_trip() {
        let (ctx, _) = context();
        let wkt = "SRID=4326;POLYGON((0 0,10 0,10 10,0 10,0 0),(2 2,2 4,4 4,4 2,2 2))";
        let g = geometry_in(&ctx, &[Datum::from(wkt)]).unwrap();
        assert_eq!(text(geometry_out(&ctx, &[g]).unwrap()), wkt);
        let g = geometry_from_text(&ctx, &[Datum::from("LINESTRING Z EMPTY")]).unwrap();
        assert_eq!(text(geometry_out(&ctx, &[g]).unwrap()), "LINESTRING Z EMPTY");
    }

    #[test]
    fn exact_text_keeps_rationals() {
        let (ctx, _) = context();
        let e = exact_in(&ctx, &[Datum::from("SRID=2154;POINT(1/3 2)")]).unwrap();
        assert!(matches!(e, Datum::Exact(_)));
        let out = exact_out(&ctx, &[e.clone()]).unwrap();
        assert_eq!(out, Datum::Text("SRID=2154;POINT(1/3 2)".to_string()));
        assert_eq!(exact_in(&ctx, &[out]).unwrap(), e);

        let r = ref_in(&ctx, &[Datum::from("POINT(1/3 2/7)")]).unwrap();
        assert_eq!(text(ref_out(&ctx, &[r]).unwrap()), "POINT(1/3 2/7)");
    }

    #[test]
    fn output_precision_applies_to_geometry_only() {
        let (mut ctx, _) = context();
        ctx.config_mut().output_precision = 2;
        let g = geometry_in(&ctx, &[Datum::from("POINT(0.126 2)")]).unwrap();
        assert_eq!(text(geometry_out(&ctx, &[g]).unwrap()), "POINT(0.13 2)");
        let e = exact_in(&ctx, &[Datum::from("POINT(1/8 2)")]).unwrap();
        assert_eq!(text(exact_out(&ctx, &[e]).unwrap()), "POINT(1/8 2)");
    }

    #[test]
    fn stale_reference_prints_deleted() {
        let (ctx, tree) = context();
        tree.subscribe(ctx.pool().clone());
        let scope = tree.create_child(ScopeId(1), false).unwrap();
        tree.switch_to(scope).unwrap();

        let r = ref_from_text(&ctx, &[Datum::from("POINT(1 2)")]).unwrap();
        assert_eq!(text(ref_out(&ctx, &[r.clone()]).unwrap()), "POINT(1 2)");

        tree.delete(scope).unwrap();
        assert_eq!(text(ref_out(&ctx, &[r.clone()]).unwrap()), "-deleted-");
        let err = geom_from_ref(&ctx, &[r]).unwrap_err();
        assert!(matches!(err.source, GeoExactError::StaleHandle(_)));
    }

    #[test]
    fn casts_between_strategies() {
        let (ctx, _) = context();
        let g = geometry_in(&ctx, &[Datum::from("SRID=4326;TRIANGLE Z ((0 0 0,1 0 0,0 1 1,0 0 0))")])
            .unwrap();
        let e = exact_from_geom(&ctx, &[g.clone()]).unwrap();
        let r = ref_from_geom(&ctx, &[g.clone()]).unwrap();
        assert_eq!(geom_from_exact(&ctx, &[e]).unwrap(), g);
        assert_eq!(geom_from_ref(&ctx, &[r]).unwrap(), g);
    }

    #[test]
    fn bad_input() {
        let (ctx, _) = context();
        let err = geometry_in(&ctx, &[Datum::from("POINT(1")]).unwrap_err();
        assert_eq!(err.function, "geometry_in");
        assert!(matches!(err.source, GeoExactError::Deserialization(_)));

        let err = exact_out(&ctx, &[Datum::Int4(3)]).unwrap_err();
        assert!(matches!(err.source, GeoExactError::InvalidArgument(_)));
        assert!(ref_in(&ctx, &[]).is_err());
        assert_eq!(ref_in(&ctx, &[Datum::Null]).unwrap(), Datum::Null);
    }
}
