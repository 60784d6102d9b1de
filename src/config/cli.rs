use crate::core::{ServiceList, UsageSink};
use crate::utils::error::Result;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Prints bundles and totals to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    pub fn render(services: &ServiceList) -> String {
        let mut lines = Vec::new();

        for service in services.iter() {
            lines.push(format!("📱 {}", service.identifier()));
            lines.extend(service.bundles().iter().map(|bundle| format!("  {}", bundle)));
            lines.push(format!(
                "  Cap remaining: {:.2} GB",
                service.bundles().cap_remaining_bytes() as f64 / GIB
            ));
        }

        if services.len() > 1 {
            lines.push(format!(
                "Anytime data remaining: {:.2} GB",
                services.non_free_bytes_remaining() as f64 / GIB
            ));
            lines.push(format!(
                "Night surfer remaining: {:.2} GB",
                services.night_surfer_remaining() as f64 / GIB
            ));
        }

        lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

impl UsageSink for ConsoleSink {
    fn report(&self, services: &ServiceList) -> Result<()> {
        print!("{}", Self::render(services));
        Ok(())
    }
}
