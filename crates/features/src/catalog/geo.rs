use crate::feature_record;

feature_record! {
    /// Map rendering features of a field.
    pub struct GeoFieldFeatures(Geo) keyed by GeoFieldFeature {
        Type => map_type: String = None;
        Zoom => zoom: i64 = None;
        /// Renderer specific options, comma separated in descriptors.
        OtherParameters => other_parameters: Vec<String> = None;
    }
}
