use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{ConfigError, Record, RuleSpec};
use crate::validators::{Registry, Validate};

/// An immutable, shared sequence of constructed validator instances.
///
/// Compilation memoizes these per fingerprint, so two compilations of equal
/// rule lists against records with equal field snapshots return the same
/// allocation (observable via [`Arc::ptr_eq`]).
pub type CompiledRules = Arc<Vec<Arc<dyn Validate>>>;

/// BLAKE3 digest of a rule list plus a record's field snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Fingerprint([u8; 32]);

/// Turns rule specifications into validator instances, memoizing by content.
///
/// The cache is owned by the `Compiler` instance: create one per validation
/// session or batch and drop it when the session ends. Keys are a fingerprint
/// of the serialized rule list and the record's full field snapshot, not the
/// record's identity, so repeated evaluation of the same rules against
/// unchanged data re-uses the constructed instances, while any field change
/// produces a fresh set. A custom validator kind whose construction depends
/// on record state outside the field snapshot would defeat this keying; bind
/// such state through rule options instead.
///
/// The cache is lock-guarded: construction happens at most once per
/// fingerprint, and a completed sequence is published before any other
/// thread can observe the entry.
pub struct Compiler {
    registry: Registry,
    cache: Mutex<HashMap<Fingerprint, CompiledRules>>,
}

impl Compiler {
    /// A compiler over the built-in validator kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// A compiler over a caller-assembled registry.
    #[must_use]
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Construct (or re-use) the validator instances for a rule list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IncompleteRule`] when a spec is missing its
    /// attribute selector or kind, [`ConfigError::UnknownKind`] for an
    /// unregistered kind, or the constructor's own option errors.
    pub fn compile(
        &self,
        record: &Record,
        specs: &[RuleSpec],
    ) -> Result<CompiledRules, ConfigError> {
        let key = fingerprint(record, specs)?;

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(&key) {
            return Ok(Arc::clone(cached));
        }

        let mut validators: Vec<Arc<dyn Validate>> = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.attributes().is_empty() || spec.kind().is_empty() {
                return Err(ConfigError::IncompleteRule {
                    record: record.name().to_owned(),
                });
            }
            validators.push(self.registry.construct(
                spec.kind(),
                record,
                spec.attributes().to_vec(),
                spec.options(),
            )?);
        }

        let compiled: CompiledRules = Arc::new(validators);
        cache.insert(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of memoized rule sets.
    #[must_use]
    pub fn cached_sets(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("registry", &self.registry)
            .field("cached_sets", &self.cached_sets())
            .finish()
    }
}

fn fingerprint(record: &Record, specs: &[RuleSpec]) -> Result<Fingerprint, ConfigError> {
    // Canonical bytes: rule serialization is the fixed 3-element form and
    // field maps iterate sorted, so equal content hashes equally.
    let mut hasher = blake3::Hasher::new();
    hasher.update(&serde_json::to_vec(specs)?);
    hasher.update(&serde_json::to_vec(record.fields())?);
    Ok(Fingerprint(*hasher.finalize().as_bytes()))
}
