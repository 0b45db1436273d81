//! Reusable Dioxus RSX components for the forecast pages.

mod anchor_form;
mod chart_header;
mod chart_type_toggle;
mod date_range_picker;
mod error_display;
mod export_button;
mod loading_spinner;
mod month_stepper;
mod surface_panel;

pub use anchor_form::AnchorForm;
pub use chart_header::ChartHeader;
pub use chart_type_toggle::ChartTypeToggle;
pub use date_range_picker::DateRangePicker;
pub use error_display::ErrorDisplay;
pub use export_button::ExportButton;
pub use loading_spinner::LoadingSpinner;
pub use month_stepper::MonthStepper;
pub use surface_panel::SurfacePanel;
