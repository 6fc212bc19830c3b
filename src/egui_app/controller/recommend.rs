use super::*;
use crate::crops;
use crate::predict::{self, NUTRIENT_RANGE, PH_RANGE};

impl CropController {
    /// Run the Home page recommendation for the current form values.
    pub fn recommend(&mut self) {
        tracing::info!("Recommendation button clicked.");
        self.clamp_reading();
        self.ui.home.result = None;
        self.ui.home.error = None;
        let Some(model) = self.model.as_ref() else {
            let reason = self
                .ui
                .home
                .model_error
                .clone()
                .unwrap_or_else(|| "no model loaded".to_string());
            tracing::error!("Error during recommendation: {reason}");
            self.ui.home.error = Some(format!(
                "An error occurred during crop recommendation: {reason}"
            ));
            self.set_status("Recommendation failed", StatusTone::Error);
            return;
        };
        match predict::predict_crop(model, &self.ui.home.reading) {
            Ok(prediction) => {
                let text = format!(
                    "Recommended {} ({:.2})",
                    crops::display_name(&prediction.label),
                    prediction.probability
                );
                self.ui.home.result = Some(prediction);
                self.set_status(text, StatusTone::Success);
            }
            Err(err) => {
                tracing::error!("Error during recommendation: {err}");
                self.ui.home.error =
                    Some(format!("An error occurred during crop recommendation: {err}"));
                self.set_status("Recommendation failed", StatusTone::Error);
            }
        }
    }

    fn clamp_reading(&mut self) {
        let reading = &mut self.ui.home.reading;
        for value in [
            &mut reading.nitrogen,
            &mut reading.phosphorus,
            &mut reading.potassium,
        ] {
            *value = value.clamp(*NUTRIENT_RANGE.start(), *NUTRIENT_RANGE.end());
        }
        reading.ph = reading.ph.clamp(*PH_RANGE.start(), *PH_RANGE.end());
    }
}
