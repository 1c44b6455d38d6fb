//! The shared machinery behind every generated entry point.

use std::marker::PhantomData;
use std::sync::Arc;

use log::warn;

use crate::error::{GeoExactError, Result};
use crate::exact::{Geometry, PreparedGeometry};
use crate::function::{CallError, CallResult, Datum, FunctionContext};
use crate::simple::SRID_UNKNOWN;
use crate::storage::{CopyStrategy, ExactStrategy, PersistenceStrategy, ReferenceStrategy};

/// A [`PersistenceStrategy`] bound to one [`Datum`] variant.
///
/// Each generated function is generic over this trait and is registered once per
/// implementation, under its base name plus [`SUFFIX`][Self::SUFFIX].
pub trait BoundaryStrategy: PersistenceStrategy + 'static {
    /// Appended to the base function name.
    const SUFFIX: &'static str;

    fn select(ctx: &FunctionContext) -> &Self;

    fn token(datum: &Datum) -> Option<&Self::Token>;

    fn wrap(token: Self::Token) -> Datum;
}

impl BoundaryStrategy for CopyStrategy {
    const SUFFIX: &'static str = "";

    fn select(ctx: &FunctionContext) -> &Self {
        ctx.copy_strategy()
    }

    fn token(datum: &Datum) -> Option<&Self::Token> {
        match datum {
            Datum::Geometry(token) => Some(token),
            _ => None,
        }
    }

    fn wrap(token: Self::Token) -> Datum {
        Datum::Geometry(token)
    }
}

impl BoundaryStrategy for ReferenceStrategy {
    const SUFFIX: &'static str = "_ref";

    fn select(ctx: &FunctionContext) -> &Self {
        ctx.reference_strategy()
    }

    fn token(datum: &Datum) -> Option<&Self::Token> {
        match datum {
            Datum::Ref(token) => Some(token),
            _ => None,
        }
    }

    fn wrap(token: Self::Token) -> Datum {
        Datum::Ref(token)
    }
}

impl BoundaryStrategy for ExactStrategy {
    const SUFFIX: &'static str = "_exact";

    fn select(ctx: &FunctionContext) -> &Self {
        ctx.exact_strategy()
    }

    fn token(datum: &Datum) -> Option<&Self::Token> {
        match datum {
            Datum::Exact(token) => Some(token),
            _ => None,
        }
    }

    fn wrap(token: Self::Token) -> Datum {
        Datum::Exact(token)
    }
}

/// One invocation of a generated entry point.
///
/// Arguments are consumed left to right. The SRID of the first geometry argument is kept
/// for the result.
pub(crate) struct Call<'a, S: BoundaryStrategy> {
    ctx: &'a FunctionContext,
    name: String,
    args: &'a [Datum],
    next: usize,
    srid: Option<i32>,
    strategy: PhantomData<S>,
}

impl<'a, S: BoundaryStrategy> Call<'a, S> {
    pub(crate) fn new(
        ctx: &'a FunctionContext,
        base: &str,
        args: &'a [Datum],
        arity: usize,
    ) -> CallResult<Self> {
        let name = format!("{base}{}", S::SUFFIX);
        if args.len() != arity {
            let err = GeoExactError::InvalidArgument(format!(
                "{name} takes {arity} arguments, got {}",
                args.len()
            ));
            return Err(CallError::new(name, err));
        }
        Ok(Self {
            ctx,
            name,
            args,
            next: 0,
            srid: None,
            strategy: PhantomData,
        })
    }

    /// Whether any argument is SQL null, in which case the call yields null.
    pub(crate) fn has_null(&self) -> bool {
        self.args.iter().any(Datum::is_null)
    }

    fn argument(&mut self) -> CallResult<&'a Datum> {
        let args = self.args;
        let datum = args.get(self.next).ok_or_else(|| {
            CallError::new(
                self.name.clone(),
                GeoExactError::InvalidArgument("missing argument".to_string()),
            )
        })?;
        self.next += 1;
        Ok(datum)
    }

    fn mismatch(&self, expected: &str, datum: &Datum) -> CallError {
        CallError::new(
            self.name.clone(),
            GeoExactError::InvalidArgument(format!(
                "argument {} must be {expected}, got {}",
                self.next,
                datum.type_name()
            )),
        )
    }

    pub(crate) fn geometry(&mut self) -> CallResult<Arc<PreparedGeometry>> {
        let datum = self.argument()?;
        let token = S::token(datum).ok_or_else(|| self.mismatch("a geometry", datum))?;
        let prepared = S::select(self.ctx)
            .decode(token)
            .map_err(|e| CallError::new(self.name.clone(), e))?;
        self.srid.get_or_insert(prepared.srid);
        Ok(prepared)
    }

    pub(crate) fn float8(&mut self) -> CallResult<f64> {
        let datum = self.argument()?;
        datum.as_float8().ok_or_else(|| self.mismatch("float8", datum))
    }

    pub(crate) fn int4(&mut self) -> CallResult<i32> {
        let datum = self.argument()?;
        datum.as_int4().ok_or_else(|| self.mismatch("int4", datum))
    }

    /// Wrap an algorithm failure, rendering every input for the diagnostics.
    fn failed(&self, source: GeoExactError) -> CallError {
        let strategy = S::select(self.ctx);
        let precision = self.ctx.config().diagnostic_precision;
        let inputs = self
            .args
            .iter()
            .enumerate()
            .map(|(i, datum)| {
                let text = match S::token(datum) {
                    Some(token) => strategy
                        .as_text(token, precision)
                        .unwrap_or_else(|e| format!("<unprintable: {e}>")),
                    None => datum.render_scalar(),
                };
                warn!("{}: input {} was {}", self.name, i + 1, text);
                text
            })
            .collect();
        CallError {
            function: self.name.clone(),
            inputs,
            source,
        }
    }

    pub(crate) fn finish<T: Into<Datum>>(self, result: Result<T>) -> CallResult<Datum> {
        result.map(Into::into).map_err(|e| self.failed(e))
    }

    pub(crate) fn finish_geometry(self, result: Result<Geometry>) -> CallResult<Datum> {
        let geometry = result.map_err(|e| self.failed(e))?;
        let prepared = PreparedGeometry::new(geometry, self.srid.unwrap_or(SRID_UNKNOWN));
        S::select(self.ctx)
            .encode(prepared)
            .map(S::wrap)
            .map_err(|e| CallError::new(self.name, e))
    }
}

/// Define an entry point generic over [`BoundaryStrategy`].
///
/// ```text
/// sql_function!(name(ctx; a: Geometry, b: Float8) -> Float8 { body });
/// ```
///
/// Arguments are `Geometry` (bound as `Arc<PreparedGeometry>`), `Float8` or `Int4`. The
/// body evaluates to `Result<T>` where `T` is `f64`, `bool` or an exact geometry for the
/// returns `Float8`, `Bool` and `Geometry`.
macro_rules! sql_function {
    (@arg $call:ident, Geometry) => { $call.geometry()? };
    (@arg $call:ident, Float8) => { $call.float8()? };
    (@arg $call:ident, Int4) => { $call.int4()? };
    (@ret $call:ident, Geometry, $result:expr) => { $call.finish_geometry($result) };
    (@ret $call:ident, Float8, $result:expr) => { $call.finish::<f64>($result) };
    (@ret $call:ident, Bool, $result:expr) => { $call.finish::<bool>($result) };
    (
        $(#[$meta:meta])*
        $name:ident($ctx:ident; $($arg:ident: $kind:ident),+) -> $ret:ident $body:block
    ) => {
        $(#[$meta])*
        pub fn $name<S: $crate::function::BoundaryStrategy>(
            $ctx: &$crate::function::FunctionContext,
            args: &[$crate::function::Datum],
        ) -> $crate::function::CallResult<$crate::function::Datum> {
            let arity = [$(stringify!($arg)),+].len();
            let mut call = $crate::function::call::Call::<S>::new($ctx, stringify!($name), args, arity)?;
            if call.has_null() {
                return Ok($crate::function::Datum::Null);
            }
            $(let $arg = $crate::function::call::sql_function!(@arg call, $kind);)+
            let result = (|| -> $crate::error::Result<_> { $body })();
            $crate::function::call::sql_function!(@ret call, $ret, result)
        }
    };
}

pub(crate) use sql_function;
