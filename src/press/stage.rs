/// One press-artifact transform over a flattened RGB raster.
///
/// Stages are pure with respect to their parameters: the same input image
/// always yields the same output, and a stage constructed at its neutral
/// parameter is a byte-exact identity.
pub trait PressStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// True when this stage's parameters make it an identity transform.
    fn is_neutral(&self) -> bool;

    fn apply(&self, image: &mut image::RgbImage);
}
