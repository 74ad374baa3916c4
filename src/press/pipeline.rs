use tracing::debug;

use crate::press::dot_gain::DotGain;
use crate::press::misregister::Misregister;
use crate::press::stage::PressStage;
use crate::press::vignette::Vignette;
use crate::scene::model::PrintConfig;

/// The fixed, explicitly ordered chain of press-artifact stages.
///
/// Order is declared exactly once, here: misregistration, then dot gain,
/// then vignette. Reordering is a behavior change, not a refactor. New
/// stages append without disturbing the existing ones.
pub struct PressPipeline {
    stages: Vec<Box<dyn PressStage>>,
}

impl PressPipeline {
    pub fn from_config(config: &PrintConfig) -> Self {
        Self {
            stages: vec![
                Box::new(Misregister::from_config(config)),
                Box::new(DotGain::from_config(config)),
                Box::new(Vignette::from_config(config)),
            ],
        }
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage in order, in place.
    pub fn process(&self, image: &mut image::RgbImage) {
        for stage in &self.stages {
            if stage.is_neutral() {
                debug!(stage = stage.name(), "neutral, skipped");
                continue;
            }
            stage.apply(image);
            debug!(stage = stage.name(), "applied");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/press/pipeline.rs"]
mod tests;
