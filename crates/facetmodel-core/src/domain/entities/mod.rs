pub mod descriptor;
pub mod facet;
pub mod holder;
pub mod pojo;
pub mod ranking;
pub mod specification;
pub mod universe;

pub use crate::domain::DomainError;
pub use descriptor::{Annotation, ConstructorDescriptor, MethodDescriptor, TypeDescriptor};
pub use facet::{Facet, FacetPayload, FacetType};
pub use holder::{FacetHolder, HasFacets};
pub use specification::{MetaModel, ObjectSpecification};
