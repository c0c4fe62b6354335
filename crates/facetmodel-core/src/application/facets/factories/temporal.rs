use std::sync::Arc;

use crate::application::facets::factory::{FacetFactory, FactoryContext, ProcessClassContext};
use crate::domain::{
    FacetPayload, FacetType, FeatureType, Precedence, TemporalConfig, TemporalValueSemantics,
    annotations,
};

/// Value types declared `Value(semantics = "temporal")` get date-time parsing
/// and encoding. A `format` attribute is tried before the configured ones.
#[derive(Debug, Default)]
pub struct TemporalValueFacetFactory {
    config: TemporalConfig,
}

impl TemporalValueFacetFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacetFactory for TemporalValueFacetFactory {
    fn name(&self) -> &'static str {
        "temporal-value"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        FeatureType::OBJECT
    }

    fn inject(&mut self, context: &FactoryContext) {
        self.config = context.config.temporal.clone();
    }

    fn process_class(&self, ctx: &mut ProcessClassContext<'_>) {
        let Some(value) = ctx.cls.annotation(annotations::VALUE) else {
            return;
        };
        if !value
            .attribute("semantics")
            .is_some_and(|s| s.eq_ignore_ascii_case("temporal"))
        {
            return;
        }
        let mut config = self.config.clone();
        if let Some(format) = value.attribute("format") {
            config.formats.retain(|f| f != format);
            config.formats.insert(0, format.to_owned());
        }
        ctx.facets.add(
            FacetType::TEMPORAL_VALUE,
            Precedence::Annotation,
            FacetPayload::Temporal(Arc::new(TemporalValueSemantics::new(config))),
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::application::facets::method_remover::CandidateMethods;
    use crate::domain::{Annotation, FacetHolder, Identifier, TypeDescriptor};

    fn run(ty: &TypeDescriptor) -> FacetHolder {
        let holder = FacetHolder::new(Identifier::for_type(ty.name.clone()), FeatureType::Object);
        let mut remover = CandidateMethods::default();
        let mut ctx = ProcessClassContext::new(ty, &mut remover, &holder);
        TemporalValueFacetFactory::new().process_class(&mut ctx);
        holder
    }

    #[test]
    fn declared_format_takes_priority() {
        let ty = TypeDescriptor::builder("Timestamp")
            .annotated(
                Annotation::new("Value")
                    .with("semantics", "temporal")
                    .with("format", "%d/%m/%Y"),
            )
            .build()
            .unwrap();
        let holder = run(&ty);
        let facet = holder.get_facet(FacetType::TEMPORAL_VALUE).unwrap();
        let semantics = facet.payload().as_temporal().unwrap();

        assert_eq!(semantics.config().formats[0], "%d/%m/%Y");
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            semantics.parse("03/02/2024", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn other_value_types_are_ignored() {
        let ty = TypeDescriptor::builder("Money")
            .annotated(Annotation::new("Value").with("semantics", "decimal"))
            .build()
            .unwrap();
        assert!(!run(&ty).contains_facet(FacetType::TEMPORAL_VALUE));
    }
}
