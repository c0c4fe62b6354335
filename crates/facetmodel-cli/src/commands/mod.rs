//! Command handlers: translate parsed arguments into service calls and
//! render the results.  No metamodel logic lives here.

pub mod completions;
pub mod config;
pub mod inspect;
pub mod validate;

use std::sync::Arc;

use tracing::debug;

use facetmodel_adapters::{DescriptorLoader, FileLayoutSource};
use facetmodel_core::application::{MetaModelService, SpecificationLoader};

use crate::{cli::ModelArgs, config::AppConfig};

/// Wire the file adapters into a [`MetaModelService`].
///
/// Flags win over the configuration file.
pub(crate) fn metamodel_service(args: &ModelArgs, config: &AppConfig) -> MetaModelService {
    let mut metamodel = config.metamodel.clone();
    if args.require_action_annotation {
        metamodel.actions.require_annotation = true;
    }
    let strict = args.strict || config.descriptors.strict;
    let source = DescriptorLoader::new(&args.dir).strict(strict);

    let mut loader = SpecificationLoader::new(Arc::new(metamodel), Arc::new(source));
    if let Some(dir) = args.layouts.as_ref().or(config.descriptors.layouts.as_ref()) {
        debug!(layouts = %dir.display(), "using layout directory");
        loader = loader.with_layouts(Arc::new(FileLayoutSource::new(dir)));
    }
    MetaModelService::new(loader)
}
