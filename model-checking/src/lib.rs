#[cfg(feature = "mc_event_complete")]
mod event_complete;
#[cfg(feature = "mc_ns_unknown_smc")]
mod ns_unknown_smc;
#[cfg(feature = "mc_translate_attributes")]
mod translate_attributes;
