pub mod classify;
pub mod collector;
pub mod field;
pub mod fragment;
pub mod setter;

pub use classify::{PayloadKind, ScalarKind, TypeClassifier};
pub use collector::FieldCollector;
pub use field::{variable_name, AnnotatedField};
pub use fragment::{FragmentModel, SetterCandidate};
pub use setter::{needs_setter, resolve_setter};
