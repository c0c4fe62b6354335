//! Facet discovery: the factory contract, the standard factories, the
//! programming model that orders them and the processor that runs them.

pub mod factories;
pub mod factory;
pub mod method_remover;
pub mod naming;
pub mod processor;
pub mod programming_model;

pub use factory::{
    CollectionTypeRegistry, FacetFactory, FacetSink, FactoryContext, MethodFilteringFacetFactory,
    ProcessClassContext, ProcessMethodContext, ProcessParameterContext,
    PropertyOrCollectionIdentifyingFacetFactory,
};
pub use method_remover::{CandidateMethods, MethodRemover};
pub use processor::{CompiledFactoryIndex, FacetProcessor, FacetProcessorBuilder, compile};
pub use programming_model::ProgrammingModel;
