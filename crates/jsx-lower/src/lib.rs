pub mod jsx_transform;
pub mod magic_string;
pub mod mode;
pub mod options;
pub mod parser;
pub mod scope;
pub mod transform;

pub use magic_string::MagicString;
pub use options::{JsxMode, JsxOptions, NormalizedJsxOptions};
pub use parser::Parser;
pub use transform::JsxTransform;
