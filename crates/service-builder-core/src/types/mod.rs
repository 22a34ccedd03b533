mod application;
mod field;
mod field_type;
mod model;
mod pagination;
mod restful_actions;

pub use application::Application;
pub use field::Field;
pub use field_type::FieldType;
pub use model::Model;
pub use pagination::Pagination;
pub use restful_actions::{RestfulAction, RestfulActions};
