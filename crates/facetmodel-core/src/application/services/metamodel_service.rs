//! MetaModel Service - the use cases the CLI drives.
//!
//! Builds models through a [`SpecificationLoader`] and turns specifications
//! into plain summaries for display.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        layout::LayoutOutcome,
        ports::{ObjectInstantiator, ServiceInjector},
        services::SpecificationLoader,
    },
    domain::{
        FacetType, HasFacets, MetaModel, MixinFacet, MixinRuntime, ObjectSpecification, Pojo,
        TypeName,
    },
    error::MetaModelResult,
};

/// One facet, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetInfo {
    pub facet_type: String,
    pub precedence: String,
    pub value: String,
}

/// One member, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    pub id: String,
    pub kind: String,
    pub mixed_in: Option<String>,
    pub facets: Vec<FacetInfo>,
}

/// A specification, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificationSummary {
    pub type_name: String,
    pub mixin: bool,
    pub facets: Vec<FacetInfo>,
    pub members: Vec<MemberInfo>,
}

fn facets_of(holder: &impl HasFacets) -> Vec<FacetInfo> {
    holder
        .facet_holder()
        .facets()
        .iter()
        .map(|f| FacetInfo {
            facet_type: f.facet_type().to_string(),
            precedence: f.precedence().to_string(),
            value: f.payload().describe(),
        })
        .collect()
}

impl SpecificationSummary {
    pub fn of(spec: &ObjectSpecification) -> Self {
        let associations = spec
            .properties()
            .iter()
            .chain(spec.collections())
            .map(|a| MemberInfo {
                id: a.id().to_owned(),
                kind: a.kind().to_string(),
                mixed_in: a.mixed_in().map(TypeName::to_string),
                facets: facets_of(a),
            });
        let actions = spec.actions().iter().map(|a| MemberInfo {
            id: a.id().to_owned(),
            kind: "action".into(),
            mixed_in: a.mixed_in().map(TypeName::to_string),
            facets: facets_of(a),
        });
        Self {
            type_name: spec.type_name().to_string(),
            mixin: spec.is_mixin(),
            facets: facets_of(spec),
            members: associations.chain(actions).collect(),
        }
    }
}

/// Orchestrates metamodel builds and queries over a built model.
#[derive(Debug)]
pub struct MetaModelService {
    loader: SpecificationLoader,
}

impl MetaModelService {
    pub fn new(loader: SpecificationLoader) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &SpecificationLoader {
        &self.loader
    }

    /// Build the model; validation failures are recorded, not returned.
    pub fn build(&self) -> MetaModelResult<MetaModel> {
        self.loader.load_all()
    }

    /// Build the model and fail if it has any validation failure.
    #[instrument(skip_all)]
    pub fn build_validated(&self) -> MetaModelResult<MetaModel> {
        let model = self.loader.load_all()?;
        let model = model.into_result()?;
        info!(specifications = model.len(), "Metamodel is valid");
        Ok(model)
    }

    pub fn summaries(&self, model: &MetaModel) -> Vec<SpecificationSummary> {
        model
            .specifications()
            .map(|spec| SpecificationSummary::of(spec))
            .collect()
    }

    pub fn describe(
        &self,
        model: &MetaModel,
        type_name: &TypeName,
    ) -> MetaModelResult<SpecificationSummary> {
        model
            .specification(type_name)
            .map(|spec| SpecificationSummary::of(spec))
            .ok_or_else(|| {
                ApplicationError::SpecificationNotFound {
                    type_name: type_name.to_string(),
                }
                .into()
            })
    }

    pub fn reload_layout(
        &self,
        model: &MetaModel,
        type_name: &TypeName,
    ) -> MetaModelResult<LayoutOutcome> {
        self.loader.reload_layout(model, type_name)
    }

    /// The mixin facet of `mixin_type`, if it is a mixin.
    pub fn mixin(&self, model: &MetaModel, mixin_type: &TypeName) -> Option<Arc<MixinFacet>> {
        model
            .specification(mixin_type)?
            .get_facet(FacetType::MIXIN)?
            .payload()
            .as_mixin()
            .cloned()
    }

    /// Instantiate `mixin_type` over `holder` using the host's runtime.
    #[instrument(skip_all, fields(mixin = %mixin_type, holder = %holder.type_name()))]
    pub fn instantiate_mixin(
        &self,
        model: &MetaModel,
        mixin_type: &TypeName,
        holder: &Pojo,
        instantiator: &dyn ObjectInstantiator,
        injector: &dyn ServiceInjector,
    ) -> MetaModelResult<Option<Pojo>> {
        let mixin = self.mixin(model, mixin_type).ok_or_else(|| {
            ApplicationError::SpecificationNotFound {
                type_name: mixin_type.to_string(),
            }
        })?;
        let runtime = MixinRuntime {
            types: model.types(),
            instantiator,
            injector,
        };
        Ok(mixin.instantiate(Some(holder), runtime)?)
    }
}
