use super::super::Model;
use shared::{ClassificationResult, Severity, ANALYSIS_ERROR_CONDITION};
use yew::prelude::*;

/// Badge colour per severity: low is green, medium yellow, high red.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "#2e9e44",
        Severity::Medium => "#e0b400",
        Severity::High => "#d63031",
    }
}

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "Low risk",
        Severity::Medium => "Medium risk",
        Severity::High => "High risk",
    }
}

pub fn render_results(model: &Model) -> Html {
    if model.state.is_analyzing() {
        return html! {
            <div class="results-container loading">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p>{"Analyzing image..."}</p>
            </div>
        };
    }

    match model.state.result() {
        Some(result) => render_result_card(result),
        None => html! {},
    }
}

fn render_result_card(result: &ClassificationResult) -> Html {
    let confidence = result.confidence_percent();
    let is_error = result.condition == ANALYSIS_ERROR_CONDITION;
    let color = severity_color(result.severity);

    html! {
        <div class={classes!("results-container", format!("severity-{}", result.severity), is_error.then_some("analysis-error"))}>
            <div class="result-header">
                <h2>
                    {
                        if is_error {
                            html! { <i class="fa-solid fa-triangle-exclamation"></i> }
                        } else {
                            html! { <i class="fa-solid fa-notes-medical"></i> }
                        }
                    }
                    { format!(" {}", result.condition) }
                </h2>
                <span class="severity-badge" style={format!("background-color: {};", color)}>
                    { severity_label(result.severity) }
                </span>
            </div>
            <div class="confidence-meter">
                <div class="meter-label">{"Confidence:"}</div>
                <div class="meter">
                    <div class="meter-fill" style={format!("width: {}%; background-color: {};", confidence, color)}></div>
                </div>
                <div class="meter-value">{format!("{:.0}%", confidence)}</div>
            </div>
            <p class="result-description">{ &result.description }</p>
            <p class="result-timestamp">
                { format!("Analyzed at {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")) }
            </p>
        </div>
    }
}
