pub mod urgency_sweep;
