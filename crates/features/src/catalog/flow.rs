use crate::feature_record;

feature_record! {
    /// Navigation features of an action or an event.
    pub struct FlowActionFeatures(Flow) keyed by FlowActionFeature {
        /// Class (by name) to forward to once the action completes.
        Next => next: String = None;
        /// Screen position for `next`.
        Position => position: String = None;
        Error => error: String = None;
        /// Go back in history once the action completes.
        Back => back: bool = Some(false);
        ConfirmRequired => confirm_required: bool = Some(false);
        ConfirmMessage => confirm_message: String = None;
    }
}
