// Content core: section addressing, the fallback resolver, the tree form
// editor, field validation, and the bundled defaults they fall back to.

pub mod defaults;
pub mod editor;
pub mod handlers;
pub mod path;
pub mod resolver;
pub mod section;
pub mod validation;
