use super::node::{Node, NodeKind};

/// Rewrites sequences with several optional position dependent elements so that
/// every alternative keeps at most one of them optional.
///
/// ```text
/// [a] [b] [c]  ->  [a] | a [b] | a b [c]
///  a  [b] [c]  ->  a [b] | a b [c]
/// a [b] [c] d  ->  a [b] d | a b [c] d
/// ```
///
/// Skipping `a` while supplying `b` is no longer possible, which leaves a single
/// way to bind any input.
pub fn fix_position_dependence(node: Node) -> Node {
	let optional = node.is_optional();
	let repeating = node.is_repeating();

	let is_sequence = matches!(node.kind(), NodeKind::Sequence { .. });
	let is_options = matches!(node.kind(), NodeKind::Options { .. });

	let mut fixed = if is_sequence {
		let children: Vec<Node> = node
			.into_children()
			.into_iter()
			.map(fix_position_dependence)
			.collect();

		match split_optional_slots(&children) {
			Some(options) => {
				log::trace!("split sequence into {} alternatives", options.children().len());
				options
			}
			None => Node::sequence(children),
		}
	} else if is_options {
		let mut options = Node::options();
		for alternative in node.into_children() {
			let alternative = fix_position_dependence(alternative);

			// a split alternative joins its siblings, as `(a | b) | c` does
			if is_plain_options(&alternative) {
				for nested in alternative.into_children() {
					options.push_alternative(Some(nested));
				}
			} else {
				options.push_alternative(Some(alternative));
			}
		}
		options
	} else {
		return node;
	};

	if optional {
		fixed.set_optional();
	}
	if repeating {
		fixed.set_repeating();
	}
	fixed
}

fn is_plain_options(node: &Node) -> bool {
	matches!(node.kind(), NodeKind::Options { .. }) && !node.is_optional() && !node.is_repeating()
}

fn is_slot(node: &Node) -> bool {
	node.is_optional() && node.is_position_dependent()
}

/// Everything except optional position dependent elements.
fn retained(nodes: &[Node]) -> impl Iterator<Item = Node> + '_ {
	nodes.iter().filter(|node| !is_slot(node)).cloned()
}

fn split_optional_slots(list: &[Node]) -> Option<Node> {
	let slots: Vec<usize> = (0..list.len()).filter(|&i| is_slot(&list[i])).collect();
	if slots.len() < 2 {
		return None;
	}

	// first alternative keeps the first slot optional and drops the later ones
	let first = slots[0];
	let mut alternatives: Vec<Vec<Node>> = Vec::with_capacity(slots.len());
	alternatives.push(list[..=first].iter().cloned().chain(retained(&list[first + 1..])).collect());

	for pair in slots.windows(2) {
		let (previous, slot) = (pair[0], pair[1]);

		// the previous alternative already made every slot before `previous` mandatory
		let mut alternative: Vec<Node> = alternatives[alternatives.len() - 1][..previous].to_vec();

		let mut required = list[previous].clone();
		required.clear_optional();
		alternative.push(required);

		alternative.extend_from_slice(&list[previous + 1..=slot]);
		alternative.extend(retained(&list[slot + 1..]));
		alternatives.push(alternative);
	}

	let mut options = Node::options();
	for mut alternative in alternatives {
		let node = if alternative.len() == 1 {
			alternative.pop()
		} else {
			Some(Node::sequence(alternative))
		};
		options.push_alternative(node);
	}

	Some(options)
}
