// SPDX-License-Identifier: MIT OR Apache-2.0

//! ORAlign: merge two patterns and one occurrence of each into a longer
//! pattern without re-scanning the source sequences.
//!
//! Given an optional canonical prefix that both patterns extend, the
//! alignment walks both node lists and the prefix in lock-step. Nodes that
//! are shared history (both sides sitting on the prefix's current node and
//! binding the *same* concrete event) and are appended once. On divergence the
//! candidate with the earlier `(time, node)` pair wins, and the source that
//! contributes the first divergent node becomes the new pattern's canonical
//! parent; this is recorded once and never overwritten.
//!
//! A pair whose occurrences do not agree on the prefix binding is not
//! joinable; alignment reports this as `None` rather than an error, and the
//! caller treats it as a silent exclusion. The low-storage engine avoids
//! most such probes up front through the prefix-occurrence identity test.
//!
//! Mark bookkeeping: fresh marks are allocated by the builder as starts are
//! appended; two numbering maps keyed by `(symbol, source mark)`, one per
//! source pattern, carry the old-to-new mapping so each later matching end
//! node is remapped consistently with its start.

use super::builder::PatternBuilder;
use super::occurrence::Occurrence;
use super::pattern::HybridTemporalPattern;
use crate::core::error::{HtpmError, HtpmResult};
use crate::core::event::{Event, EventNode};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Which join source became the canonical parent of the aligned pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedParent {
    First,
    Second,
}

/// Result of a successful alignment
#[derive(Debug, Clone)]
pub struct Alignment {
    pub pattern: Arc<HybridTemporalPattern>,
    pub occurrence: Arc<Occurrence>,
    pub parent: AlignedParent,
}

type MarkMap = HashMap<(u32, u32), u32>;

/// Align `(p1, o1)` and `(p2, o2)` over their shared canonical prefix.
///
/// Returns `Ok(None)` when the pair is not joinable: occurrences from
/// different sequences, identical occurrences, or occurrences that
/// disagree on the binding of the shared prefix.
pub fn or_align(
    prefix: Option<&Arc<HybridTemporalPattern>>,
    p1: &Arc<HybridTemporalPattern>,
    o1: &Arc<Occurrence>,
    p2: &Arc<HybridTemporalPattern>,
    o2: &Arc<Occurrence>,
) -> HtpmResult<Option<Alignment>> {
    if o1.sequence_id() != o2.sequence_id() || o1 == o2 {
        return Ok(None);
    }

    let n1 = p1.nodes();
    let n2 = p2.nodes();
    let pf: &[EventNode] = prefix.map(|p| p.nodes()).unwrap_or(&[]);

    let mut builder = PatternBuilder::new(Arc::clone(o1.sequence_id_arc()));
    let mut map1: MarkMap = HashMap::new();
    let mut map2: MarkMap = HashMap::new();
    let (mut i1, mut i2, mut ip) = (0usize, 0usize, 0usize);
    let mut parent: Option<AlignedParent> = None;

    while i1 < n1.len() || i2 < n2.len() {
        let shared = i1 < n1.len()
            && i2 < n2.len()
            && ip < pf.len()
            && n1[i1].same_shape(&pf[ip])
            && n2[i2].same_shape(&pf[ip])
            && Arc::ptr_eq(o1.event(i1), o2.event(i2));

        if shared {
            append_shared(
                &mut builder,
                &n1[i1],
                &n2[i2],
                o1.event(i1),
                &mut map1,
                &mut map2,
            )?;
            i1 += 1;
            i2 += 1;
            ip += 1;
            continue;
        }

        let take_first = if i1 >= n1.len() {
            false
        } else if i2 >= n2.len() {
            true
        } else {
            let t1 = n1[i1].time_in(o1.event(i1));
            let t2 = n2[i2].time_in(o2.event(i2));
            match t1.partial_cmp(&t2).expect("non-finite event time") {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => n1[i1].cmp(&n2[i2]) != Ordering::Greater,
            }
        };

        if take_first {
            append_divergent(&mut builder, &n1[i1], o1.event(i1), &mut map1)?;
            parent.get_or_insert(AlignedParent::First);
            i1 += 1;
        } else {
            append_divergent(&mut builder, &n2[i2], o2.event(i2), &mut map2)?;
            parent.get_or_insert(AlignedParent::Second);
            i2 += 1;
        }
    }

    // The prefix must have been consumed in full; a leftover means the
    // occurrences never agreed on the shared history.
    if ip != pf.len() {
        return Ok(None);
    }
    let parent = match parent {
        Some(parent) => parent,
        None => return Ok(None),
    };

    let (parent_pattern, parent_occurrence) = match parent {
        AlignedParent::First => (p1, o1),
        AlignedParent::Second => (p2, o2),
    };
    let (pattern, occurrence) =
        builder.finish(Some(parent_pattern), Some(Arc::clone(parent_occurrence)))?;
    Ok(Some(Alignment {
        pattern,
        occurrence,
        parent,
    }))
}

fn append_shared(
    builder: &mut PatternBuilder,
    node1: &EventNode,
    node2: &EventNode,
    event: &Arc<Event>,
    map1: &mut MarkMap,
    map2: &mut MarkMap,
) -> HtpmResult<()> {
    match node1 {
        EventNode::Point { .. } => {
            builder.append_point(event);
        }
        EventNode::IntervalStart { symbol, mark } => {
            let fresh = builder.append_start(event);
            map1.insert((symbol.key(), *mark), fresh);
            if let Some(old2) = node2.mark() {
                map2.insert((symbol.key(), old2), fresh);
            }
        }
        EventNode::IntervalEnd { symbol, mark } => {
            let fresh = *map1.get(&(symbol.key(), *mark)).ok_or_else(|| {
                HtpmError::structural(format!(
                    "shared end node {node1} closes an interval never opened in this alignment"
                ))
            })?;
            builder.append_end(event, fresh)?;
        }
    }
    Ok(())
}

fn append_divergent(
    builder: &mut PatternBuilder,
    node: &EventNode,
    event: &Arc<Event>,
    map: &mut MarkMap,
) -> HtpmResult<()> {
    match node {
        EventNode::Point { .. } => {
            builder.append_point(event);
        }
        EventNode::IntervalStart { symbol, mark } => {
            let fresh = builder.append_start(event);
            map.insert((symbol.key(), *mark), fresh);
        }
        EventNode::IntervalEnd { symbol, mark } => {
            let fresh = *map.get(&(symbol.key(), *mark)).ok_or_else(|| {
                HtpmError::structural(format!(
                    "end node {node} closes an interval never opened in this alignment"
                ))
            })?;
            builder.append_end(event, fresh)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::builder::PatternBuilder;

    fn seq() -> Arc<str> {
        Arc::from("s1")
    }

    #[test]
    fn test_align_point_with_interval() {
        let sid = seq();
        let b = Arc::new(Event::interval("al_b", 6.0, 12.0).unwrap());
        let a = Arc::new(Event::point("al_a", 8.0).unwrap());
        let (pb, ob) = PatternBuilder::length_one(&sid, &b).unwrap();
        let (pa, oa) = PatternBuilder::length_one(&sid, &a).unwrap();

        let aligned = or_align(None, &pb, &ob, &pa, &oa).unwrap().unwrap();
        assert_eq!(aligned.pattern.pattern_string(), "al_b+0<al_a<al_b-0");
        assert_eq!(aligned.occurrence.times(&aligned.pattern), vec![6.0, 8.0, 12.0]);
        // b opens first, so the interval pattern is the canonical parent
        assert_eq!(aligned.parent, AlignedParent::First);
        assert!(Arc::ptr_eq(
            &aligned.pattern.canonical_prefix().unwrap(),
            &pb
        ));
        assert!(Arc::ptr_eq(aligned.occurrence.prefix().unwrap(), &ob));
    }

    #[test]
    fn test_self_join_remaps_marks() {
        let sid = seq();
        let first = Arc::new(Event::interval("al_s", 5.0, 10.0).unwrap());
        let second = Arc::new(Event::interval("al_s", 8.0, 12.0).unwrap());
        let (p, o_first) = PatternBuilder::length_one(&sid, &first).unwrap();
        let (_, o_second) = PatternBuilder::length_one(&sid, &second).unwrap();

        let aligned = or_align(None, &p, &o_first, &p, &o_second).unwrap().unwrap();
        assert_eq!(
            aligned.pattern.pattern_string(),
            "al_s+0<al_s+1<al_s-0<al_s-1"
        );
        assert_eq!(
            aligned.occurrence.times(&aligned.pattern),
            vec![5.0, 8.0, 10.0, 12.0]
        );
    }

    #[test]
    fn test_identical_occurrences_not_joinable() {
        let sid = seq();
        let e = Arc::new(Event::point("al_c", 3.0).unwrap());
        let (p, o) = PatternBuilder::length_one(&sid, &e).unwrap();
        let o_copy = Arc::new((*o).clone());
        assert!(or_align(None, &p, &o, &p, &o_copy).unwrap().is_none());
    }

    #[test]
    fn test_cross_sequence_not_joinable() {
        let e1 = Arc::new(Event::point("al_c", 3.0).unwrap());
        let e2 = Arc::new(Event::point("al_c", 5.0).unwrap());
        let (p1, o1) = PatternBuilder::length_one(&Arc::from("s1"), &e1).unwrap();
        let (p2, o2) = PatternBuilder::length_one(&Arc::from("s2"), &e2).unwrap();
        assert!(or_align(None, &p1, &o1, &p2, &o2).unwrap().is_none());
    }

    #[test]
    fn test_prefix_binding_disagreement_rejected() {
        // p1 and p2 both extend the length-1 pattern (c), but their
        // occurrences bind the prefix point to different events.
        let sid = seq();
        let c1 = Arc::new(Event::point("al_pt", 1.0).unwrap());
        let c2 = Arc::new(Event::point("al_pt", 2.0).unwrap());
        let c3 = Arc::new(Event::point("al_pt", 3.0).unwrap());
        let c4 = Arc::new(Event::point("al_pt", 4.0).unwrap());

        let (prefix, o_c1) = PatternBuilder::length_one(&sid, &c1).unwrap();
        let (_, o_c2) = PatternBuilder::length_one(&sid, &c2).unwrap();

        // two-point pattern c<c: one bound to (c1, c3), the other to (c2, c4)
        let left = or_align(None, &prefix, &o_c1, &prefix, &{
            let (_, o_c3) = PatternBuilder::length_one(&sid, &c3).unwrap();
            o_c3
        })
        .unwrap()
        .unwrap();
        let right = or_align(None, &prefix, &o_c2, &prefix, &{
            let (_, o_c4) = PatternBuilder::length_one(&sid, &c4).unwrap();
            o_c4
        })
        .unwrap()
        .unwrap();

        let joined = or_align(
            Some(&prefix),
            &left.pattern,
            &left.occurrence,
            &right.pattern,
            &right.occurrence,
        )
        .unwrap();
        assert!(joined.is_none());
    }

    #[test]
    fn test_shared_prefix_consumed_once() {
        let sid = seq();
        let c1 = Arc::new(Event::point("al_sh", 1.0).unwrap());
        let c2 = Arc::new(Event::point("al_sh", 5.0).unwrap());
        let c3 = Arc::new(Event::point("al_sh", 9.0).unwrap());

        let (prefix, o_c1) = PatternBuilder::length_one(&sid, &c1).unwrap();
        let (_, o_c2) = PatternBuilder::length_one(&sid, &c2).unwrap();
        let (_, o_c3) = PatternBuilder::length_one(&sid, &c3).unwrap();

        // both extensions share the binding of the prefix point to c1
        let left = or_align(None, &prefix, &o_c1, &prefix, &o_c2).unwrap().unwrap();
        let right = or_align(None, &prefix, &o_c1, &prefix, &o_c3).unwrap().unwrap();

        let joined = or_align(
            Some(&prefix),
            &left.pattern,
            &left.occurrence,
            &right.pattern,
            &right.occurrence,
        )
        .unwrap()
        .unwrap();

        assert_eq!(joined.pattern.pattern_string(), "al_sh<al_sh<al_sh");
        assert_eq!(joined.occurrence.times(&joined.pattern), vec![1.0, 5.0, 9.0]);
    }
}
