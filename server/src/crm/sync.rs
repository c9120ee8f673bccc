//! Call Outcome Sync
//!
//! Records dialer call outcomes as notes on the matching CRM contact.
//! Best effort: nothing is retried and failures are only logged.

use tracing::{info, warn};

use super::client::{contact_id, CrmClient};
use super::types::ContactLookup;
use crate::vicidial::types::CallStatusReport;

/// Note text describing a call outcome.
pub fn call_note(report: &CallStatusReport) -> String {
    let field = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("unknown")
            .to_string()
    };

    let mut note = format!(
        "Dialer call status: {}\nAgent: {}\nCall date: {}\nCampaign: {}\nList: {}\nLead: {}",
        field(&report.status),
        field(&report.agent),
        field(&report.call_date),
        field(&report.campaign_id),
        field(&report.list_id),
        field(&report.lead_id),
    );
    if let Some(comments) = report.comments.as_deref().filter(|c| !c.trim().is_empty()) {
        note.push_str("\nComments: ");
        note.push_str(comments.trim());
    }
    note
}

/// Find the contact by phone and attach a call note to it.
pub async fn record_call_status(client: &CrmClient, report: &CallStatusReport) {
    let lookup = ContactLookup::new(report.phone_number.as_deref(), None);
    if lookup.is_empty() {
        return;
    }

    let contacts = match client.lookup_contacts(&lookup).await {
        Ok(contacts) => contacts,
        Err(e) => {
            warn!(
                phone_number = ?lookup.phone,
                upstream_status = ?e.upstream_status(),
                error = %e,
                "CRM contact lookup for call status failed"
            );
            return;
        }
    };

    let Some(id) = contacts.first().and_then(contact_id) else {
        info!(phone_number = ?lookup.phone, "No CRM contact matches call status");
        return;
    };

    match client.add_note(&id, &call_note(report)).await {
        Ok(_) => info!(contact_id = %id, status = ?report.status, "Call status recorded in CRM"),
        Err(e) => warn!(contact_id = %id, error = %e, "Failed to record call status in CRM"),
    }
}
