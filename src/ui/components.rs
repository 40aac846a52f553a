mod checkbox;
mod text_input;

pub use checkbox::Checkbox;
pub use text_input::{TextInput, TextInputEvent};
