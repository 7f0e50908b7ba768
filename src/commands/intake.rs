use clap::{Args, Subcommand};
use healthcoach_core::{
    parse_amount, progress_percent, Clock, DailyRecord, Tracker, TrackerError, PROTEIN_PRESETS,
    WATER_PRESETS,
};
use serde_json::json;

use super::{progress_bar, OutputFormat};
use crate::config::Config;

/// Which counter an intake command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intake {
    Protein,
    Water,
}

impl Intake {
    pub fn name(&self) -> &'static str {
        match self {
            Intake::Protein => "Protein",
            Intake::Water => "Water",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Intake::Protein => "g",
            Intake::Water => "oz",
        }
    }

    pub fn presets(&self) -> [u32; 3] {
        match self {
            Intake::Protein => PROTEIN_PRESETS,
            Intake::Water => WATER_PRESETS,
        }
    }

    pub fn goal(&self, config: &Config) -> u32 {
        match self {
            Intake::Protein => config.protein_goal.value,
            Intake::Water => config.water_goal.value,
        }
    }

    pub fn total(&self, daily: &DailyRecord) -> u32 {
        match self {
            Intake::Protein => daily.protein_total,
            Intake::Water => daily.water_total,
        }
    }

    fn add<C: Clock>(&self, tracker: &mut Tracker<C>, amount: u32) -> Result<u32, TrackerError> {
        match self {
            Intake::Protein => tracker.add_protein(amount),
            Intake::Water => tracker.add_water(amount),
        }
    }

    /// One-line summary such as `Protein: 35/150g [###-----] 23%`.
    pub fn summary(&self, total: u32, goal: u32) -> String {
        let percent = progress_percent(total, goal);
        format!(
            "{}: {}/{}{} {} {}%",
            self.name(),
            total,
            goal,
            self.unit(),
            progress_bar(percent),
            percent
        )
    }
}

#[derive(Args)]
pub struct IntakeCommand {
    #[command(subcommand)]
    pub command: IntakeSubcommand,
}

#[derive(Subcommand)]
pub enum IntakeSubcommand {
    /// Add a custom amount (leading digits are used, e.g. "25g")
    Add {
        /// Amount to add
        amount: String,
    },

    /// Add one of the quick-add presets
    Quick {
        /// Preset number (protein: 1=10g 2=25g 3=50g, water: 1=8oz 2=16oz 3=32oz)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        preset: u8,
    },

    /// Show today's total against the goal
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl IntakeCommand {
    pub fn run<C: Clock>(
        &self,
        intake: Intake,
        tracker: &mut Tracker<C>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            IntakeSubcommand::Add { amount } => {
                let Some(parsed) = parse_amount(amount) else {
                    println!("'{}' is not a valid amount. Nothing was added.", amount);
                    return Ok(());
                };
                self.add(intake, parsed, tracker, config)
            }
            IntakeSubcommand::Quick { preset } => {
                let amount = intake.presets()[usize::from(*preset) - 1];
                self.add(intake, amount, tracker, config)
            }
            IntakeSubcommand::Show { format } => {
                tracker.ensure_current_day()?;
                let total = intake.total(tracker.daily());
                let goal = intake.goal(config);

                match format {
                    OutputFormat::Json => {
                        let value = json!({
                            "date": tracker.daily().date,
                            "total": total,
                            "goal": goal,
                            "unit": intake.unit(),
                            "percent": progress_percent(total, goal),
                        });
                        println!("{}", serde_json::to_string_pretty(&value)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", intake.summary(total, goal));
                    }
                }
                Ok(())
            }
        }
    }

    fn add<C: Clock>(
        &self,
        intake: Intake,
        amount: u32,
        tracker: &mut Tracker<C>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let total = intake.add(tracker, amount)?;
        println!("Added {}{}.", amount, intake.unit());
        println!("{}", intake.summary(total, intake.goal(config)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        assert_eq!(
            Intake::Protein.summary(75, 150),
            format!("Protein: 75/150g [{}{}] 50%", "#".repeat(10), "-".repeat(10))
        );
        assert!(Intake::Water.summary(130, 100).ends_with("100%"));
    }

    #[test]
    fn test_presets() {
        assert_eq!(Intake::Protein.presets(), [10, 25, 50]);
        assert_eq!(Intake::Water.presets(), [8, 16, 32]);
    }
}
