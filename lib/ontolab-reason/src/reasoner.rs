use crate::error::ReasoningError;
use crate::rules::{Derivations, OWL_RL_RULES, RDFS_RULES, Rule};
use crate::vocab::owl;
use oxrdf::vocab::rdf;
use oxrdf::{Graph, NamedOrBlankNode, Term, TripleRef};
use std::fmt;
use tracing::{debug, info, trace, warn};

/// The set of entailment rules applied by a [`ClosureReasoner`].
///
/// * [`Rdfs`](Self::Rdfs): `prp-dom`, `prp-rng`, `prp-spo1`, `cax-sco`, `scm-sco` and `scm-spo`.
/// * [`OwlRl`](Self::OwlRl): the RDFS rules plus `cax-eqc1`, `cax-eqc2`, `scm-eqc1`,
///   `prp-eqp1`, `prp-eqp2`, `prp-symp`, `prp-trp`, `prp-inv1`, `prp-inv2`, `cls-int1`,
///   `cls-int2`, `cls-uni`, `cls-svf1`, `cls-svf2`, `cls-hv1`, `cls-hv2`, `cls-avf`, `eq-sym`,
///   `eq-trans`, `eq-rep-s` and `eq-rep-o`.
///   `owl:someValuesFrom` also accepts data ranges: XSD datatypes, `rdfs:Literal` and
///   `owl:onDatatype` restrictions with the `xsd:minInclusive`, `xsd:minExclusive`,
///   `xsd:maxInclusive` and `xsd:maxExclusive` facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReasoningProfile {
    Rdfs,
    #[default]
    OwlRl,
}

impl ReasoningProfile {
    fn rules(self) -> impl Iterator<Item = &'static Rule> {
        let extra: &'static [Rule] = match self {
            Self::Rdfs => &[],
            Self::OwlRl => OWL_RL_RULES,
        };
        RDFS_RULES.iter().chain(extra)
    }
}

impl fmt::Display for ReasoningProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rdfs => "RDFS",
            Self::OwlRl => "OWL 2 RL",
        })
    }
}

/// Bounds on a closure computation.
#[derive(Debug, Clone)]
pub struct ReasonerConfig {
    /// Maximum number of rule application rounds.
    pub max_iterations: usize,
    /// Maximum number of inferred triples (`None` = unlimited).
    pub max_inferred_triples: Option<usize>,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_inferred_triples: None,
        }
    }
}

/// Counters describing a closure computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClosureStats {
    /// Number of triples before reasoning.
    pub input_triples: usize,
    /// Number of triples in the closure.
    pub output_triples: usize,
    /// Number of triples added by reasoning.
    pub inferred_triples: usize,
    /// Number of rounds evaluated, including the last one that found nothing new.
    pub iterations: usize,
}

/// A clash detected in a graph by the OWL 2 RL consistency rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    /// `cax-dw`: the individual is an instance of two disjoint classes.
    DisjointClasses {
        individual: NamedOrBlankNode,
        first: Term,
        second: Term,
    },
    /// `cls-nothing2`: the individual is an instance of `owl:Nothing`.
    Nothing { individual: NamedOrBlankNode },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisjointClasses {
                individual,
                first,
                second,
            } => write!(
                f,
                "{individual} is an instance of the disjoint classes {first} and {second}"
            ),
            Self::Nothing { individual } => {
                write!(f, "{individual} is an instance of {}", owl::NOTHING)
            }
        }
    }
}

/// A forward chaining reasoner computing the closure of a graph under a [`ReasoningProfile`].
///
/// Each round evaluates every rule against the current graph and inserts the new triples.
/// The computation stops when a round adds nothing.
///
/// ```
/// use ontolab_reason::{ClosureReasoner, ReasoningProfile};
/// use oxrdf::vocab::rdf;
/// use oxrdf::{Graph, NamedNodeRef, TripleRef};
///
/// let knows = NamedNodeRef::new("http://example.com/knows")?;
/// let alice = NamedNodeRef::new("http://example.com/alice")?;
/// let bob = NamedNodeRef::new("http://example.com/bob")?;
/// let symmetric = NamedNodeRef::new("http://www.w3.org/2002/07/owl#SymmetricProperty")?;
///
/// let mut graph = Graph::new();
/// graph.insert(TripleRef::new(knows, rdf::TYPE, symmetric));
/// graph.insert(TripleRef::new(alice, knows, bob));
///
/// let closure = ClosureReasoner::new(ReasoningProfile::OwlRl).closure(&graph)?;
/// assert!(closure.contains(TripleRef::new(bob, knows, alice)));
/// assert_eq!(graph.len(), 2);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClosureReasoner {
    profile: ReasoningProfile,
    config: ReasonerConfig,
}

impl ClosureReasoner {
    pub fn new(profile: ReasoningProfile) -> Self {
        Self {
            profile,
            config: ReasonerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ReasonerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn profile(&self) -> ReasoningProfile {
        self.profile
    }

    /// Adds to `graph` every triple derivable from it.
    pub fn expand(&self, graph: &mut Graph) -> Result<ClosureStats, ReasoningError> {
        let input_triples = graph.len();
        debug!(profile = %self.profile, triples = input_triples, "Computing closure");
        for iteration in 1..=self.config.max_iterations {
            let mut derivations = Derivations::new(&*graph);
            for rule in self.profile.rules() {
                let before = derivations.len();
                (rule.apply)(&mut derivations);
                if derivations.len() > before {
                    trace!(
                        rule = rule.name,
                        iteration,
                        new = derivations.len() - before,
                        "Rule fired"
                    );
                }
            }
            let new = derivations.into_triples();
            if new.is_empty() {
                let stats = ClosureStats {
                    input_triples,
                    output_triples: graph.len(),
                    inferred_triples: graph.len() - input_triples,
                    iterations: iteration,
                };
                info!(
                    profile = %self.profile,
                    before = stats.input_triples,
                    after = stats.output_triples,
                    iterations = stats.iterations,
                    "Closure computed"
                );
                return Ok(stats);
            }
            debug!(iteration, new = new.len(), "Closure round");
            for triple in &new {
                graph.insert(triple);
            }
            let inferred = graph.len() - input_triples;
            if let Some(limit) = self.config.max_inferred_triples {
                if inferred > limit {
                    return Err(ReasoningError::MaterializationLimit { limit, inferred });
                }
            }
        }
        Err(ReasoningError::IterationLimit {
            limit: self.config.max_iterations,
        })
    }

    /// Returns the closure of `graph` as a new graph.
    pub fn closure(&self, graph: &Graph) -> Result<Graph, ReasoningError> {
        let mut closure: Graph = graph.iter().collect();
        self.expand(&mut closure)?;
        Ok(closure)
    }

    /// Lists the clashes present in `graph`.
    ///
    /// Only the [`OwlRl`](ReasoningProfile::OwlRl) profile checks consistency.
    /// The graph should already be closed for the result to be complete.
    pub fn inconsistencies(&self, graph: &Graph) -> Vec<Inconsistency> {
        if self.profile != ReasoningProfile::OwlRl {
            return Vec::new();
        }
        let mut clashes = Vec::new();
        for t in graph.triples_for_predicate(owl::DISJOINT_WITH) {
            for individual in graph.subjects_for_predicate_object(rdf::TYPE, t.subject) {
                if graph.contains(TripleRef::new(individual, rdf::TYPE, t.object)) {
                    clashes.push(Inconsistency::DisjointClasses {
                        individual: individual.into_owned(),
                        first: t.subject.into_owned().into(),
                        second: t.object.into_owned(),
                    });
                }
            }
        }
        for individual in graph.subjects_for_predicate_object(rdf::TYPE, owl::NOTHING) {
            clashes.push(Inconsistency::Nothing {
                individual: individual.into_owned(),
            });
        }
        for clash in &clashes {
            warn!("Inconsistency: {clash}");
        }
        clashes
    }
}
