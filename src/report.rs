//! Report generation for synthesized configurations and classified mutants
//!
//! This module formats and displays run summaries on stdout.

use colored::Colorize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::descriptor::{histogram, MutantClass};
use crate::synth::RuleSet;
use crate::taxonomy::{Op, Role, Taxonomy};

/// Summary of one configuration generation
#[derive(Debug)]
pub struct GenerationReport {
    pub per_matcher: BTreeMap<Op, usize>,
    pub keys: usize,
    pub duration: Duration,
}

impl GenerationReport {
    pub fn new(rules: &RuleSet, duration: Duration) -> Self {
        Self {
            per_matcher: rules.counts_by_matcher(),
            keys: rules.groups().len(),
            duration,
        }
    }

    /// Total number of rules
    pub fn total(&self) -> usize {
        self.per_matcher.values().sum()
    }

    /// Matchers with at least one rule
    pub fn matchers(&self) -> usize {
        self.per_matcher.values().filter(|&&n| n > 0).count()
    }

    /// The `n` matchers with most rules, ties by operator order
    pub fn busiest(&self, n: usize) -> Vec<(Op, usize)> {
        let mut counts: Vec<(Op, usize)> = self.per_matcher.iter().map(|(&op, &c)| (op, c)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }

    pub fn print(&self, verbose: bool) {
        println!();
        println!("{}", "Mutant Configuration Report".bold());
        println!("{}", "=".repeat(60));

        if verbose {
            println!();
            for (op, count) in &self.per_matcher {
                println!("  {:<16} {}", op.token(), count);
            }
        }

        println!();
        println!("{}", "Summary".bold());
        println!("{}", "-".repeat(40));
        println!("Matchers:          {}", self.matchers());
        println!("Rule keys:         {}", self.keys);
        println!("Rules:             {}", self.total().to_string().green().bold());
        println!("Duration:          {}", format_duration(self.duration));

        let busiest = self.busiest(5);
        if !busiest.is_empty() {
            println!();
            println!("{}", "Most mutated operators".dimmed());
            for (op, count) in busiest {
                println!("  • {} {}", op.token().yellow(), format!("({count})").dimmed());
            }
        }
    }
}

/// Summary of a mutant classification run
#[derive(Debug)]
pub struct ClassificationReport<'a> {
    pub level: i32,
    pub considered: usize,
    pub counts: BTreeMap<&'a str, usize>,
}

impl<'a> ClassificationReport<'a> {
    pub fn new(classes: &'a [MutantClass], level: i32) -> Self {
        Self {
            level,
            considered: classes.len(),
            counts: histogram(classes),
        }
    }

    pub fn print(&self) {
        println!();
        println!(
            "{} {}",
            "Mutant Classification Report".bold(),
            format!("(level {})", self.level).dimmed()
        );
        println!("{}", "=".repeat(60));
        println!();

        for (class, count) in &self.counts {
            let share = *count as f64 / self.considered.max(1) as f64 * 100.0;
            println!("{:>7} {:>6.1}%  {}", count, share, class);
        }

        println!();
        println!("{}", "Summary".bold());
        println!("{}", "-".repeat(40));
        println!("Mutants:           {}", self.considered);
        println!("Classes:           {}", self.counts.len());
    }
}

/// Print every operator with its role, arity and class path
pub fn print_operators(taxonomy: &Taxonomy) {
    println!("{}", "Operators".bold());
    println!("{}", "=".repeat(60));
    for operator in taxonomy.operators() {
        let role = match operator.role {
            Role::MatchOnly => "match".cyan(),
            Role::ReplaceOnly => "replace".magenta(),
            Role::Both => "both".normal(),
        };
        let commutative = if taxonomy.is_commutative(operator.op) {
            " commutative".dimmed()
        } else {
            "".normal()
        };
        println!(
            "{:<16} {:<8} arity {}{}",
            operator.op.token(),
            role,
            operator.arity(),
            commutative
        );
        println!("        {}", operator.class_path.to_string().dimmed());
    }
}

/// Format duration in a human-readable way
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}
