mod helpers;
mod test_admin_flows;
mod test_complaint_flows;
mod test_notes_flows;
