//! Combinators composing casters
//!
//! | Combinator    | Operator | On success              | On failure                       |
//! |---------------|----------|-------------------------|----------------------------------|
//! | [`And`]       | `&`      | feeds value to right    | returns left failure             |
//! | [`Or`]        | `\|`     | returns left            | runs right on original input     |
//! | [`Aggregate`] | `*`      | feeds value to right    | runs right too, merges errors    |
//! | [`Then`]      | -        | feeds value to `then`   | runs else on original input      |
//! | [`Switch`]    | -        | first matching clause   | else branch or `switch` error    |
//!
//! [`Around`] hands the input and a wrapped caster to user code.
//! [`Lazy`] defers construction for recursive schemas; [`PassIf`] keeps the
//! original input when its base succeeds.

mod aggregate;
mod around;
mod and;
mod lazy;
mod or;
mod pass_if;
mod switch;
mod then;

pub use aggregate::Aggregate;
pub use around::{Around, cast_around};
pub use and::{And, and_all};
pub use lazy::{Lazy, lazy};
pub use or::Or;
pub use pass_if::{PassIf, pass_if};
pub use switch::{Switch, switch, switch_by, switch_on, switch_on_path};
pub use then::Then;
