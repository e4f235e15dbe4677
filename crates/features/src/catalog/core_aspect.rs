use crate::feature_record;

feature_record! {
    /// Structural features of a field, read by the view and reporting aspects.
    pub struct CoreFieldFeatures(Core) keyed by CoreFieldFeature {
        /// The field's value is shown inside the owning form instead of a link.
        Embedded => embedded: bool = Some(false);
        /// The field's members are expanded into the owner; the field itself disappears.
        Expand => expand: bool = Some(false);
    }
}
