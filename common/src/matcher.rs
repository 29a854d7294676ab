//! Сопоставление звонков и визитов
//!
//! ## Алгоритм
//! 1. Визиты группируются по региону, для каждого звонка просматривается только его группа
//! 2. Остаются пары с visit_time <= call_time <= visit_end (обе границы включены)
//! 3. Кратность разрешается выбранной политикой
//!
//! Порядок кандидатов: звонки в порядке выгрузки, внутри звонка визиты в порядке выгрузки.
//! От этого порядка зависит политика first-per-call.

use crate::types::{CallRecord, MatchRecord, VisitRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Политика разрешения неоднозначных совпадений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Один визит на каждое время звонка: первый по порядку выгрузки визитов
    #[default]
    FirstPerCall,
    /// Один звонок на каждое время визита: ближайший по времени
    NearestPerVisit,
    /// Все пары, кроме полных дубликатов
    NoDedup,
}

impl MatchPolicy {
    pub const ALL: [MatchPolicy; 3] =
        [MatchPolicy::FirstPerCall, MatchPolicy::NearestPerVisit, MatchPolicy::NoDedup];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::FirstPerCall => "first-per-call",
            MatchPolicy::NearestPerVisit => "nearest-per-visit",
            MatchPolicy::NoDedup => "no-dedup",
        }
    }
}

impl std::str::FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-per-call" | "first" => Ok(MatchPolicy::FirstPerCall),
            "nearest-per-visit" | "nearest" => Ok(MatchPolicy::NearestPerVisit),
            "no-dedup" | "all" => Ok(MatchPolicy::NoDedup),
            _ => Err(format!(
                "Unknown policy: {}. Use first-per-call, nearest-per-visit, or no-dedup",
                s
            )),
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Сопоставить звонки и визиты
///
/// Пустые входы дают пустой результат. Регион, который есть только с одной стороны,
/// просто не даёт кандидатов.
pub fn match_records(
    calls: &[CallRecord],
    visits: &[VisitRecord],
    policy: MatchPolicy,
) -> Vec<MatchRecord> {
    let candidates = generate_candidates(calls, visits);
    let candidate_count = candidates.len();
    let matches = resolve(candidates, policy);
    log::debug!(
        "Кандидатов: {}, после политики {}: {}",
        candidate_count,
        policy,
        matches.len()
    );
    matches
}

/// Визиты по регионам (порядок внутри региона = порядок выгрузки)
fn bucket_by_region(visits: &[VisitRecord]) -> HashMap<&str, Vec<&VisitRecord>> {
    let mut buckets: HashMap<&str, Vec<&VisitRecord>> = HashMap::new();
    for visit in visits {
        buckets.entry(visit.region.as_str()).or_default().push(visit);
    }
    buckets
}

/// Пара-кандидат вместе с номером звонка во входном списке
///
/// Одинаковые по значениям звонки из разных строк остаются разными звонками.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub call_index: usize,
    pub record: MatchRecord,
}

fn candidates_for_call(
    call_index: usize,
    call: &CallRecord,
    buckets: &HashMap<&str, Vec<&VisitRecord>>,
) -> Vec<Candidate> {
    buckets
        .get(call.region.as_str())
        .map(|visits| {
            visits
                .iter()
                .filter(|v| v.visit_time <= call.call_time && call.call_time <= v.visit_end)
                .map(|v| Candidate { call_index, record: MatchRecord::from_pair(call, v) })
                .collect()
        })
        .unwrap_or_default()
}

/// Все пары (звонок, визит) с одним регионом и звонком внутри окна визита
pub fn generate_candidates(calls: &[CallRecord], visits: &[VisitRecord]) -> Vec<Candidate> {
    let buckets = bucket_by_region(visits);

    // collect сохраняет исходный порядок звонков
    #[cfg(feature = "parallel")]
    let candidates = calls
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, call)| candidates_for_call(i, call, &buckets))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let candidates = calls
        .iter()
        .enumerate()
        .flat_map(|(i, call)| candidates_for_call(i, call, &buckets))
        .collect();

    candidates
}

/// Применить политику к кандидатам
pub fn resolve(candidates: Vec<Candidate>, policy: MatchPolicy) -> Vec<MatchRecord> {
    match policy {
        MatchPolicy::FirstPerCall => first_per_call(candidates),
        MatchPolicy::NearestPerVisit => nearest_per_visit(candidates),
        MatchPolicy::NoDedup => drop_exact_duplicates(candidates),
    }
}

/// Группировка по времени звонка, первый кандидат в группе; результат по возрастанию времени звонка
fn first_per_call(candidates: Vec<Candidate>) -> Vec<MatchRecord> {
    let mut groups: BTreeMap<NaiveDateTime, MatchRecord> = BTreeMap::new();
    for Candidate { record, .. } in candidates {
        groups.entry(record.call_time).or_insert(record);
    }
    groups.into_values().collect()
}

/// Устойчивая сортировка по |call - visit|, затем жадный выбор один-к-одному
///
/// Кандидат остаётся, если ни его время визита, ни его строка звонка ещё не заняты
/// более близкой парой.
fn nearest_per_visit(mut candidates: Vec<Candidate>) -> Vec<MatchRecord> {
    candidates.sort_by_key(|c| c.record.delta_seconds());
    let mut used_visits: HashSet<NaiveDateTime> = HashSet::new();
    let mut used_calls: HashSet<usize> = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            if used_visits.contains(&c.record.visit_time) || used_calls.contains(&c.call_index) {
                return false;
            }
            used_visits.insert(c.record.visit_time);
            used_calls.insert(c.call_index);
            true
        })
        .map(|c| c.record)
        .collect()
}

fn drop_exact_duplicates(candidates: Vec<Candidate>) -> Vec<MatchRecord> {
    let mut seen: HashSet<MatchRecord> = HashSet::new();
    candidates
        .into_iter()
        .map(|c| c.record)
        .filter(|record| seen.insert(record.clone()))
        .collect()
}
