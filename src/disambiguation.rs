//! Human-in-the-loop resolution of records with several candidates.
//!
//! The resolver collects the candidate sets it could not settle on its own
//! into a [`DisambiguationQueue`] and hands each distinct set to a
//! [`Disambiguator`]. Interactive runs use [`PromptDisambiguator`]; tests and
//! batch runs plug in [`FnDisambiguator`] or [`SkipDisambiguator`].

use crate::{Error, Result};
use orgtract_coalesce::OrganizationCatalog;
use std::collections::HashSet;
use std::io::{BufRead, Write};

/// Operator answer for one candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// These candidates are genuine organization names.
    Accept(Vec<String>),
    /// None of the candidates is an organization.
    NoneOfThese,
    /// Stop asking. Names approved so far are kept.
    Cancel,
}

/// Answers "which of these are organization names?".
pub trait Disambiguator {
    /// Decide on one deduplicated candidate set.
    fn resolve(&mut self, candidates: &[String]) -> Result<Decision>;
}

impl<T: Disambiguator + ?Sized> Disambiguator for &mut T {
    fn resolve(&mut self, candidates: &[String]) -> Result<Decision> {
        (**self).resolve(candidates)
    }
}

/// Never asks anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipDisambiguator;

impl Disambiguator for SkipDisambiguator {
    fn resolve(&mut self, _candidates: &[String]) -> Result<Decision> {
        Ok(Decision::Cancel)
    }
}

/// Wraps a closure; handy for deterministic test answers.
///
/// ```rust
/// use orgtract::{Decision, Disambiguator, FnDisambiguator};
///
/// let mut pick_first = FnDisambiguator::new(|c: &[String]| Decision::Accept(vec![c[0].clone()]));
/// let candidates = vec!["ACME".to_string(), "BETA".to_string()];
/// let d = pick_first.resolve(&candidates).unwrap();
/// assert_eq!(d, Decision::Accept(vec!["ACME".to_string()]));
/// ```
pub struct FnDisambiguator<F> {
    f: F,
}

impl<F> FnDisambiguator<F>
where
    F: FnMut(&[String]) -> Decision,
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Disambiguator for FnDisambiguator<F>
where
    F: FnMut(&[String]) -> Decision,
{
    fn resolve(&mut self, candidates: &[String]) -> Result<Decision> {
        Ok((self.f)(candidates))
    }
}

/// Numbered menu on a reader/writer pair (normally stdin/stderr).
///
/// Accepted answers: comma- or space-separated indexes, `0` or `none` for
/// none of the candidates, `q` to stop. Anything else re-prompts. End of
/// input fails with [`Error::Cancelled`], which the queue treats as a stop.
pub struct PromptDisambiguator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDisambiguator<R, W> {
    /// Prompt on `output`, read answers from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, candidates: &[String]) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Which of these are organization names?")?;
        for (i, c) in candidates.iter().enumerate() {
            writeln!(self.output, "  [{}] {}", i + 1, c)?;
        }
        writeln!(self.output, "  [0] none of these")?;
        write!(self.output, "Numbers separated by commas (q to stop): ")?;
        self.output.flush()?;
        Ok(())
    }
}

fn parse_answer(answer: &str, candidates: &[String]) -> Option<Decision> {
    let answer = answer.trim().to_ascii_lowercase();
    match answer.as_str() {
        "" => None,
        "q" | "quit" => Some(Decision::Cancel),
        "0" | "none" | "n" => Some(Decision::NoneOfThese),
        _ => {
            let mut picked = Vec::new();
            for part in answer.split(|c: char| c == ',' || c.is_whitespace()) {
                if part.is_empty() {
                    continue;
                }
                let n: usize = part.parse().ok()?;
                let name = candidates.get(n.checked_sub(1)?)?;
                if !picked.contains(name) {
                    picked.push(name.clone());
                }
            }
            Some(Decision::Accept(picked))
        }
    }
}

impl<R: BufRead, W: Write> Disambiguator for PromptDisambiguator<R, W> {
    fn resolve(&mut self, candidates: &[String]) -> Result<Decision> {
        loop {
            self.show(candidates)?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::cancelled("operator input closed"));
            }
            match parse_answer(&line, candidates) {
                Some(decision) => return Ok(decision),
                None => writeln!(self.output, "Unrecognized answer '{}'", line.trim())?,
            }
        }
    }
}

/// What happened while draining the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueOutcome {
    /// Sets the operator answered.
    pub answered: usize,
    /// Names newly added to the catalog, in approval order.
    pub approved: Vec<String>,
    /// The operator stopped before the queue was empty.
    pub cancelled: bool,
}

/// Distinct candidate sets awaiting an operator decision.
///
/// Two records with the same candidates (in any order) produce one question.
#[derive(Debug, Clone, Default)]
pub struct DisambiguationQueue {
    sets: Vec<Vec<String>>,
    keys: HashSet<Vec<String>>,
}

impl DisambiguationQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a candidate set. Empty strings and repeats within the set are
    /// dropped; returns false if the set was empty or already queued.
    pub fn push<I, S>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<String> = Vec::new();
        for c in candidates {
            let c = c.as_ref();
            if !c.is_empty() && !set.iter().any(|s| s == c) {
                set.push(c.to_string());
            }
        }
        if set.is_empty() {
            return false;
        }
        let mut key = set.clone();
        key.sort();
        if !self.keys.insert(key) {
            return false;
        }
        self.sets.push(set);
        true
    }

    /// Queued sets in first-seen order.
    #[must_use]
    pub fn sets(&self) -> &[Vec<String>] {
        &self.sets
    }

    /// Number of distinct sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when nothing needs a decision.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Ask `disambiguator` about every set and add approved names to `catalog`.
    ///
    /// Only names from the presented set are accepted. A failing
    /// disambiguator is treated as a cancel; nothing approved before it is lost.
    pub fn drain_into(
        self,
        disambiguator: &mut dyn Disambiguator,
        catalog: &mut OrganizationCatalog,
    ) -> QueueOutcome {
        let mut outcome = QueueOutcome::default();
        let total = self.sets.len();

        for (i, set) in self.sets.into_iter().enumerate() {
            let decision = match disambiguator.resolve(&set) {
                Ok(d) => d,
                Err(Error::Cancelled(reason)) => {
                    log::info!("Disambiguation stopped: {}", reason);
                    Decision::Cancel
                }
                Err(e) => {
                    log::warn!("Disambiguation aborted: {}", e);
                    Decision::Cancel
                }
            };
            match decision {
                Decision::Cancel => {
                    log::info!("Disambiguation cancelled after {}/{} sets", i, total);
                    outcome.cancelled = true;
                    break;
                }
                Decision::NoneOfThese => {
                    outcome.answered += 1;
                }
                Decision::Accept(names) => {
                    outcome.answered += 1;
                    for name in names {
                        if !set.contains(&name) {
                            log::warn!("Ignoring '{}': not among the presented candidates", name);
                            continue;
                        }
                        if catalog.insert_label(&name) {
                            log::debug!("Operator approved '{}'", name);
                            outcome.approved.push(name);
                        }
                    }
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn set(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn queue_dedups_by_set() {
        let mut q = DisambiguationQueue::new();
        assert!(q.push(["A", "B"]));
        assert!(!q.push(["B", "A"]));
        assert!(q.push(["A", "C"]));
        assert!(!q.push(["", ""]));
        assert!(q.push(["A", "A", "D"]));
        assert_eq!(q.len(), 3);
        assert_eq!(q.sets()[2], set(&["A", "D"]));
    }

    #[test]
    fn drain_adds_approved_names() {
        let mut q = DisambiguationQueue::new();
        q.push(["ACME", "PAYMENT"]);
        q.push(["BETA", "REF"]);
        let mut catalog = OrganizationCatalog::new();
        let mut d = FnDisambiguator::new(|c: &[String]| {
            if c[0] == "ACME" {
                Decision::Accept(vec!["ACME".into(), "INVENTED".into()])
            } else {
                Decision::NoneOfThese
            }
        });
        let outcome = q.drain_into(&mut d, &mut catalog);
        assert_eq!(outcome.approved, vec!["ACME"]);
        assert_eq!(outcome.answered, 2);
        assert!(!outcome.cancelled);
        assert!(catalog.get("ACME").is_some());
        assert!(catalog.get("INVENTED").is_none());
    }

    #[test]
    fn cancel_keeps_earlier_approvals() {
        let mut q = DisambiguationQueue::new();
        q.push(["ACME", "X"]);
        q.push(["BETA", "Y"]);
        let mut catalog = OrganizationCatalog::new();
        let mut calls = 0;
        let mut d = FnDisambiguator::new(|c: &[String]| {
            calls += 1;
            if calls == 1 {
                Decision::Accept(vec![c[0].clone()])
            } else {
                Decision::Cancel
            }
        });
        let outcome = q.drain_into(&mut d, &mut catalog);
        assert!(outcome.cancelled);
        assert_eq!(outcome.approved, vec!["ACME"]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn skip_cancels_immediately() {
        let mut q = DisambiguationQueue::new();
        q.push(["ACME", "X"]);
        let mut catalog = OrganizationCatalog::new();
        let outcome = q.drain_into(&mut SkipDisambiguator, &mut catalog);
        assert!(outcome.cancelled);
        assert_eq!(outcome.answered, 0);
    }

    mod prompt {
        use super::*;

        fn ask(input: &str, candidates: &[&str]) -> (Decision, String) {
            let mut out = Vec::new();
            let decision = {
                let mut p = PromptDisambiguator::new(Cursor::new(input.to_string()), &mut out);
                p.resolve(&set(candidates)).unwrap()
            };
            (decision, String::from_utf8(out).unwrap())
        }

        #[test]
        fn picks_by_index() {
            let (d, shown) = ask("2, 1\n", &["ACME", "BETA"]);
            assert_eq!(d, Decision::Accept(set(&["BETA", "ACME"])));
            assert!(shown.contains("[1] ACME"));
            assert!(shown.contains("[0] none of these"));
        }

        #[test]
        fn none_and_quit() {
            assert_eq!(ask("0\n", &["ACME"]).0, Decision::NoneOfThese);
            assert_eq!(ask("none\n", &["ACME"]).0, Decision::NoneOfThese);
            assert_eq!(ask("q\n", &["ACME"]).0, Decision::Cancel);
        }

        #[test]
        fn eof_is_a_cancellation_error() {
            let mut out = Vec::new();
            let mut p = PromptDisambiguator::new(Cursor::new(String::new()), &mut out);
            let err = p.resolve(&set(&["ACME"])).unwrap_err();
            assert!(matches!(err, Error::Cancelled(_)), "{:?}", err);
            assert!(!err.is_fatal());
        }

        #[test]
        fn closed_input_stops_the_queue() {
            let mut q = DisambiguationQueue::new();
            q.push(["ACME", "X"]);
            q.push(["BETA", "Y"]);
            let mut catalog = OrganizationCatalog::new();
            let mut out = Vec::new();
            let mut p = PromptDisambiguator::new(Cursor::new("1\n".to_string()), &mut out);
            let outcome = q.drain_into(&mut p, &mut catalog);
            assert!(outcome.cancelled);
            assert_eq!(outcome.answered, 1);
            assert_eq!(outcome.approved, vec!["ACME"]);
        }

        #[test]
        fn bad_answer_reprompts() {
            let (d, shown) = ask("7\nabc\n1\n", &["ACME"]);
            assert_eq!(d, Decision::Accept(set(&["ACME"])));
            assert_eq!(shown.matches("Which of these").count(), 3);
        }
    }
}
