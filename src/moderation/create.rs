//! Submission form for new add-forge requests.

use afn_common::{ForgeAddRequest, NewForgeRequest};
use reqwest::Url;

use super::client::ModerationApi;
use crate::errors::{AfnError, Result};

/// Badge shown next to the form after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Success,
    Error,
}

/// Feedback displayed once the form was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFeedback {
    pub badge: Badge,
    pub message: String,
    /// The created request, on success
    pub created: Option<ForgeAddRequest>,
}

impl FormFeedback {
    pub fn is_success(&self) -> bool {
        self.badge == Badge::Success
    }
}

/// Check the form fields before anything is sent.
pub fn validate(request: &NewForgeRequest) -> Result<()> {
    if request.forge_type.trim().is_empty() {
        return Err(AfnError::InvalidForm("forge type is required".into()));
    }

    let url = Url::parse(request.forge_url.trim())
        .map_err(|e| AfnError::InvalidForm(format!("forge URL is invalid: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AfnError::InvalidForm(format!(
            "forge URL must use http or https, not '{}'",
            url.scheme()
        )));
    }

    if request.forge_contact_name.trim().is_empty() {
        return Err(AfnError::InvalidForm("contact name is required".into()));
    }

    let email = request.forge_contact_email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AfnError::InvalidForm(format!(
            "contact email '{}' is invalid",
            email
        ))),
    }
}

/// Validate and submit a new request, turning every outcome into feedback.
pub async fn submit_request<A: ModerationApi + ?Sized>(
    api: &A,
    request: &NewForgeRequest,
) -> FormFeedback {
    if let Err(e) = validate(request) {
        return FormFeedback {
            badge: Badge::Error,
            message: e.user_message(),
            created: None,
        };
    }

    match api.create_request(request).await {
        Ok(created) => {
            tracing::info!(request_id = created.id, forge_url = %created.forge_url, "Request submitted");
            FormFeedback {
                badge: Badge::Success,
                message: "Your request has been submitted".to_string(),
                created: Some(created),
            }
        }
        Err(e) if e.is_conflict() => {
            tracing::warn!(forge_url = %request.forge_url, "Duplicate request refused");
            FormFeedback {
                badge: Badge::Error,
                message: format!("Sorry; an error occurred: {}", e.user_message()),
                created: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Request submission failed");
            FormFeedback {
                badge: Badge::Error,
                message: format!(
                    "An error occurred while submitting the request: {}",
                    e.user_message()
                ),
                created: None,
            }
        }
    }
}
