pub mod condition;
pub mod eager;
pub mod error;
pub mod model;
pub mod options;
pub mod page;
pub mod repository;
pub mod value;

pub use condition::Condition;
pub use eager::{EagerLoad, RelationDef};
pub use error::DataError;
pub use model::Model;
pub use options::QueryOptions;
pub use page::{PageList, Paginator};
pub use repository::Repository;
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::condition::{
        and, between, contains, equal, greater_or_equal, greater_than, is_in, is_null, less_or_equal,
        less_than, not, not_between, not_equal, not_in, or,
    };
    pub use crate::{
        Condition, DataError, EagerLoad, Model, PageList, Paginator, QueryOptions, RelationDef,
        Repository, Value,
    };
}
