//! Property and collection accessors, and property setters.

use std::sync::Arc;

use crate::application::facets::{
    factory::{
        CollectionTypeRegistry, FacetFactory, FactoryContext,
        PropertyOrCollectionIdentifyingFacetFactory, ProcessMethodContext,
    },
    method_remover::MethodRemover,
    naming::{capitalize, member_id_after_prefix},
};
use crate::domain::{FacetPayload, FacetType, FeatureType, MethodDescriptor, Precedence};

const BOOLEAN_TYPES: &[&str] = &["bool", "boolean", "Boolean"];

fn is_boolean(method: &MethodDescriptor) -> bool {
    method
        .return_type
        .as_ref()
        .is_some_and(|t| BOOLEAN_TYPES.contains(&t.as_str()))
}

/// The member id an accessor contributes (`getFirstName` -> `firstName`).
pub fn accessor_member_id(method: &MethodDescriptor) -> Option<String> {
    member_id_after_prefix(&method.name, "get").or_else(|| {
        is_boolean(method)
            .then(|| member_id_after_prefix(&method.name, "is"))
            .flatten()
    })
}

fn looks_like_getter(method: &MethodDescriptor) -> bool {
    method.param_count() == 0 && !method.returns_void() && accessor_member_id(method).is_some()
}

// ── Collections ───────────────────────────────────────────────────────────────

/// `getOrders()` returning a registered collection type.
#[derive(Debug, Default)]
pub struct CollectionAccessorFacetFactory {
    collection_types: Arc<CollectionTypeRegistry>,
}

impl CollectionAccessorFacetFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_collection_accessor(&self, method: &MethodDescriptor) -> bool {
        looks_like_getter(method)
            && method.name.starts_with("get")
            && method
                .return_type
                .as_ref()
                .is_some_and(|t| self.collection_types.is_collection_type(t))
    }
}

impl FacetFactory for CollectionAccessorFacetFactory {
    fn name(&self) -> &'static str {
        "collection-accessor"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::COLLECTIONS_ONLY
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.collection_types = Arc::clone(&context.collection_types);
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        ctx.facets.add(
            FacetType::COLLECTION_ACCESSOR,
            Precedence::Default,
            FacetPayload::Method(Arc::clone(ctx.method)),
        );
    }

    fn method_prefixes(&self) -> &'static [&'static str] {
        &["get"]
    }

    fn as_property_or_collection_identifying(
        &self,
    ) -> Option<&dyn PropertyOrCollectionIdentifyingFacetFactory> {
        Some(self)
    }
}

impl PropertyOrCollectionIdentifyingFacetFactory for CollectionAccessorFacetFactory {
    fn is_property_or_collection_accessor_candidate(&self, method: &MethodDescriptor) -> bool {
        self.is_collection_accessor(method)
    }

    fn find_and_remove_property_accessors(
        &self,
        _remover: &mut dyn MethodRemover,
        _out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
    }

    fn find_and_remove_collection_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
        out.extend(remover.remove_methods(&mut |m| self.is_collection_accessor(m)));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

/// `getName()` / `isActive()`: no parameters, non-void, not a collection.
#[derive(Debug, Default)]
pub struct PropertyAccessorFacetFactory {
    collection_types: Arc<CollectionTypeRegistry>,
}

impl PropertyAccessorFacetFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_property_accessor(&self, method: &MethodDescriptor) -> bool {
        looks_like_getter(method)
            && !method
                .return_type
                .as_ref()
                .is_some_and(|t| self.collection_types.is_collection_type(t))
    }
}

impl FacetFactory for PropertyAccessorFacetFactory {
    fn name(&self) -> &'static str {
        "property-accessor"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::PROPERTIES_ONLY
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.collection_types = Arc::clone(&context.collection_types);
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        ctx.facets.add(
            FacetType::PROPERTY_ACCESSOR,
            Precedence::Default,
            FacetPayload::Method(Arc::clone(ctx.method)),
        );
    }

    fn method_prefixes(&self) -> &'static [&'static str] {
        &["get", "is"]
    }

    fn as_property_or_collection_identifying(
        &self,
    ) -> Option<&dyn PropertyOrCollectionIdentifyingFacetFactory> {
        Some(self)
    }
}

impl PropertyOrCollectionIdentifyingFacetFactory for PropertyAccessorFacetFactory {
    fn is_property_or_collection_accessor_candidate(&self, method: &MethodDescriptor) -> bool {
        self.is_property_accessor(method)
    }

    fn find_and_remove_property_accessors(
        &self,
        remover: &mut dyn MethodRemover,
        out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
        out.extend(remover.remove_methods(&mut |m| self.is_property_accessor(m)));
    }

    fn find_and_remove_collection_accessors(
        &self,
        _remover: &mut dyn MethodRemover,
        _out: &mut Vec<Arc<MethodDescriptor>>,
    ) {
    }
}

/// Claims `setX(T)` for a property `X` of type `T`.
#[derive(Debug, Default)]
pub struct PropertySetterFacetFactory;

impl PropertySetterFacetFactory {
    pub fn new() -> Self {
        Self
    }
}

impl FacetFactory for PropertySetterFacetFactory {
    fn name(&self) -> &'static str {
        "property-setter"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::PROPERTIES_ONLY
    }

    fn process_method(&self, ctx: &mut ProcessMethodContext<'_>) {
        let Some(property_type) = ctx.method.return_type.clone() else {
            return;
        };
        let setter_name = format!("set{}", capitalize(ctx.member_id()));
        let Some(setter) = ctx
            .remover
            .find_method(&setter_name, Some(std::slice::from_ref(&property_type)))
        else {
            return;
        };
        ctx.remover.remove_method(&setter);
        ctx.facets.add(
            FacetType::PROPERTY_SETTER,
            Precedence::Default,
            FacetPayload::Method(setter),
        );
    }

    fn method_prefixes(&self) -> &'static [&'static str] {
        &["set"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::facets::method_remover::CandidateMethods;
    use crate::domain::{FacetHolder, Identifier, TypeDescriptor, TypeName};

    fn customer() -> TypeDescriptor {
        TypeDescriptor::builder("Customer")
            .method("getName", |m| m.returning("String"))
            .method("setName", |m| m.param("String"))
            .method("isActive", |m| m.returning("boolean"))
            .method("isbn", |m| m.returning("String"))
            .method("getOrders", |m| m.returning("List<Order>"))
            .method("getTotal", |m| m.param("Currency").returning("Money"))
            .build()
            .unwrap()
    }

    fn pool(ty: &TypeDescriptor) -> CandidateMethods {
        CandidateMethods::new(ty.methods.iter().cloned().map(Arc::new))
    }

    fn names(methods: &[Arc<MethodDescriptor>]) -> Vec<&str> {
        methods.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn collections_are_claimed_before_properties() {
        let ty = customer();
        let mut remover = pool(&ty);
        let (collections, properties) = (
            CollectionAccessorFacetFactory::new(),
            PropertyAccessorFacetFactory::new(),
        );

        let mut found = Vec::new();
        collections.find_and_remove_collection_accessors(&mut remover, &mut found);
        assert_eq!(names(&found), vec!["getOrders"]);

        let mut found = Vec::new();
        properties.find_and_remove_property_accessors(&mut remover, &mut found);
        assert_eq!(names(&found), vec!["getName", "isActive"]);

        assert_eq!(
            names(remover.remaining()),
            vec!["setName", "isbn", "getTotal"]
        );
    }

    #[test]
    fn setter_is_claimed_for_matching_property() {
        let ty = customer();
        let mut remover = pool(&ty);
        let getter = Arc::new(ty.method_named("getName").unwrap().clone());
        remover.remove_method(&getter);
        let holder = FacetHolder::new(
            Identifier::for_member(TypeName::new("Customer"), "name"),
            FeatureType::Property,
        );

        let mut ctx =
            ProcessMethodContext::new(&ty, &getter, FeatureType::Property, &mut remover, &holder);
        PropertySetterFacetFactory::new().process_method(&mut ctx);

        assert_eq!(ctx.facets.added(), 1);
        assert!(remover.find_method("setName", None).is_none());
        let setter = holder.get_facet(FacetType::PROPERTY_SETTER).unwrap();
        assert_eq!(setter.payload().as_method().unwrap().name, "setName");
    }

    #[test]
    fn accessor_member_ids() {
        let ty = customer();
        assert_eq!(
            accessor_member_id(ty.method_named("isActive").unwrap()).as_deref(),
            Some("active")
        );
        assert_eq!(accessor_member_id(ty.method_named("isbn").unwrap()), None);
    }
}
