//! DSL compiler: one statement in, one node chain out.
//!
//! The script language is a single line of clauses joined by `then`:
//!
//! ```text
//! on near then if bTagged player then do attackB then wait 0.5 then wait 2.6
//! ```
//!
//! Clauses: `on <trigger>`, `if <condition> [== != > <] [value]`,
//! `do <action> [value]`, `with a|b|<tag>`, `wait <seconds>`,
//! `rewind <steps> repeat <count|infinite>`. An `if` clause may carry an
//! else branch: `if <cond> else <chain> endelse then <main chain>`.
//!
//! Compilation is best-effort, like the editor it came from: words that
//! don't parse are logged and skipped, and a statement that produces no
//! nodes is not an error. The compiler is safe to run many times across
//! levels — distinct owners keep each item's sub-graph independent even
//! though the trigger subtype indices are global.

use thiserror::Error;

use crate::core::ItemId;
use crate::tags::Tag;

use super::node::{
    format_number, ActionKind, ConditionKind, ContextKind, FlowNode, NodeId, NodeKind, Operator,
    TargetType, TargetValue, TriggerKind,
};
use super::store::Flows;

/// Longest chain the decompiler will follow before assuming a cycle.
const MAX_CHAIN_LEN: usize = 48;

/// Subtype code shared by `Wait` and `Loop` nodes (one subtype each).
const SUBTYPE_DEFAULT: i32 = 1;

/// Split a statement into words, protecting spaces inside double quotes.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push('"');
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Compile one DSL statement into `flows`, owned by `owner`.
///
/// Returns the emitted node ids in chain order (possibly empty). With
/// `quiet` set, the store's change notification is suppressed — the path
/// used when a level load compiles many statements back to back.
pub fn compile(text: &str, flows: &mut Flows, quiet: bool, owner: Option<ItemId>) -> Vec<NodeId> {
    let tokens = tokenize(&text.to_lowercase());
    let mut emitter = Emitter::new(flows, owner);
    let mut i = 0;

    while i < tokens.len() {
        let word = tokens[i].as_str();
        match word {
            "then" => i += 1,

            "else" => {
                emitter.begin_else();
                i += 1;
            }

            "endif" | "endelse" => {
                emitter.end_else();
                i += 1;
            }

            "on" => {
                if let Some(kind) = tokens.get(i + 1).and_then(|w| TriggerKind::from_word(w)) {
                    emitter.emit_trigger(kind);
                    i += 2;
                } else {
                    log::warn!("flow compile: unknown trigger after `on`");
                    i += 1;
                }
            }

            "if" => {
                let Some(kind) = tokens.get(i + 1).and_then(|w| ConditionKind::from_word(w))
                else {
                    log::warn!("flow compile: unknown condition after `if`");
                    i += 1;
                    continue;
                };
                i += 2;

                let mut operator = Operator::Equals;
                if let Some(symbol) = tokens.get(i).and_then(|w| Operator::from_symbol(w)) {
                    operator = symbol;
                    i += 1;
                }

                let target_type = kind.target_type();
                match take_value(&tokens, &mut i, target_type) {
                    Some(target) => {
                        emitter.emit(
                            NodeKind::Condition,
                            kind.code(),
                            operator,
                            target_type,
                            target,
                        );
                    }
                    None => log::warn!("flow compile: missing value for `{}`", kind.word()),
                }
            }

            "do" => {
                let Some(kind) = tokens.get(i + 1).and_then(|w| ActionKind::from_word(w)) else {
                    log::warn!("flow compile: unknown action after `do`");
                    i += 1;
                    continue;
                };
                i += 2;

                let target_type = kind.target_type();
                match take_value(&tokens, &mut i, target_type) {
                    Some(target) => {
                        emitter.emit(
                            NodeKind::Action,
                            kind.code(),
                            Operator::None,
                            target_type,
                            target,
                        );
                    }
                    None => log::warn!("flow compile: missing value for `{}`", kind.word()),
                }
            }

            "with" => {
                i += 1;
                match tokens.get(i).map(String::as_str) {
                    Some("a") => {
                        // On a two-terminal trigger `with A` just names the
                        // default operand; no node, no rerouting.
                        if !emitter.reroute_from_trigger(false) {
                            emitter.emit(
                                NodeKind::Context,
                                ContextKind::Subject.code(),
                                Operator::None,
                                TargetType::None,
                                TargetValue::None,
                            );
                        }
                        i += 1;
                    }
                    Some("b") => {
                        // Routes the rest of the chain out of the trigger's
                        // B terminal; otherwise an explicit context switch.
                        if !emitter.reroute_from_trigger(true) {
                            emitter.emit(
                                NodeKind::Context,
                                ContextKind::B.code(),
                                Operator::None,
                                TargetType::None,
                                TargetValue::None,
                            );
                        }
                        i += 1;
                    }
                    Some(_) => match take_value(&tokens, &mut i, TargetType::Tag) {
                        Some(target) => {
                            emitter.emit(
                                NodeKind::Context,
                                ContextKind::Tag.code(),
                                Operator::None,
                                TargetType::Tag,
                                target,
                            );
                        }
                        None => log::warn!("flow compile: missing tag after `with`"),
                    },
                    None => log::warn!("flow compile: dangling `with`"),
                }
            }

            "wait" => {
                i += 1;
                match take_value(&tokens, &mut i, TargetType::Number) {
                    Some(target) => {
                        emitter.emit(
                            NodeKind::Wait,
                            SUBTYPE_DEFAULT,
                            Operator::None,
                            TargetType::Number,
                            target,
                        );
                    }
                    None => log::warn!("flow compile: missing seconds after `wait`"),
                }
            }

            "rewind" => {
                let steps = tokens.get(i + 1).and_then(|w| w.parse::<usize>().ok());
                let count = match tokens.get(i + 2).map(String::as_str) {
                    Some("repeat") => match tokens.get(i + 3).map(String::as_str) {
                        Some("infinite") => Some(0.0),
                        Some(word) => word.parse::<f64>().ok(),
                        None => None,
                    },
                    _ => None,
                };
                match (steps, count) {
                    (Some(steps), Some(count)) => {
                        emitter.emit_loop(steps, count);
                        i += 4;
                    }
                    _ => {
                        log::warn!("flow compile: malformed `rewind ... repeat ...` clause");
                        i += 1;
                    }
                }
            }

            other => {
                log::warn!("flow compile: skipping unrecognized word {other:?}");
                i += 1;
            }
        }
    }

    let chain = emitter.finish();
    if !quiet {
        flows.notify_changed();
    }
    chain
}

/// Consume the next token as a clause value of the given type.
///
/// Returns the parsed value (`TargetValue::None` for valueless clauses), or
/// `None` when the clause expected a value and the next token is missing,
/// a connector, or unparsable. The index only advances on consumption.
fn take_value(tokens: &[String], i: &mut usize, target_type: TargetType) -> Option<TargetValue> {
    if target_type == TargetType::None {
        return Some(TargetValue::None);
    }

    let word = tokens.get(*i)?;
    if is_connector(word) {
        return None;
    }

    let value = parse_value(word, target_type);
    if value.is_some() {
        *i += 1;
    }
    value
}

fn is_connector(word: &str) -> bool {
    matches!(word, "then" | "else" | "endif" | "endelse")
}

fn parse_value(word: &str, target_type: TargetType) -> Option<TargetValue> {
    match target_type {
        TargetType::None => Some(TargetValue::None),
        TargetType::Number | TargetType::State => {
            word.parse::<f64>().ok().map(TargetValue::Number)
        }
        TargetType::Tag => {
            if let Ok(number) = word.parse::<f64>() {
                return Some(TargetValue::Number(number));
            }
            Tag::from_name(word).map(TargetValue::from)
        }
        TargetType::Text => Some(TargetValue::Text(word.trim_matches('"').to_string())),
    }
}

/// Chain-building state shared by the clause handlers.
struct Emitter<'a> {
    flows: &'a mut Flows,
    owner: Option<ItemId>,
    chain: Vec<NodeId>,
    prev: Option<(NodeId, NodeKind)>,
    prev_trigger_has_b: bool,
    /// Route the next edge out of the previous trigger's B terminal.
    route_b: bool,
    /// Attach the next node to the governing condition's else side.
    else_branch: bool,
    governing_condition: Option<NodeId>,
}

impl<'a> Emitter<'a> {
    fn new(flows: &'a mut Flows, owner: Option<ItemId>) -> Self {
        Self {
            flows,
            owner,
            chain: Vec::new(),
            prev: None,
            prev_trigger_has_b: false,
            route_b: false,
            else_branch: false,
            governing_condition: None,
        }
    }

    fn emit_trigger(&mut self, kind: TriggerKind) {
        self.emit(
            NodeKind::Trigger,
            kind.code(),
            Operator::None,
            TargetType::None,
            TargetValue::None,
        );
        self.prev_trigger_has_b = kind.terminal_count() == 2;
    }

    fn emit(
        &mut self,
        kind: NodeKind,
        subtype: i32,
        operator: Operator,
        target_type: TargetType,
        target: TargetValue,
    ) -> NodeId {
        let id = self
            .flows
            .add_node(self.owner, kind, subtype, operator, target_type, target);

        if let Some((prev_id, prev_kind)) = self.prev {
            let terminal = match prev_kind {
                // A condition's success branch is the gated edge; the else
                // branch continues unconditionally.
                NodeKind::Condition => !self.else_branch,
                NodeKind::Trigger => self.route_b,
                _ => false,
            };
            self.flows.add_child(prev_id, id, terminal);
        }

        self.chain.push(id);
        self.prev = Some((id, kind));
        self.prev_trigger_has_b = false;
        self.route_b = false;
        self.else_branch = false;
        if kind == NodeKind::Condition {
            self.governing_condition = Some(id);
        }
        id
    }

    fn emit_loop(&mut self, steps: usize, count: f64) {
        self.emit(
            NodeKind::Loop,
            SUBTYPE_DEFAULT,
            Operator::None,
            TargetType::Number,
            TargetValue::Number(count),
        );

        // Wire the rewind edge: `steps` clauses back from the loop's
        // predecessor. Out-of-range rewinds leave the loop childless.
        let len = self.chain.len();
        if steps > 0 && len > steps + 2 {
            let target = self.chain[len - steps - 2];
            if let Some(&loop_id) = self.chain.last() {
                self.flows.add_child(loop_id, target, false);
            }
        }
    }

    /// Handle `with a` / `with b` directly after a two-terminal trigger:
    /// no node is emitted, the chain is rerouted instead. Returns false if
    /// the previous node is not a two-terminal trigger.
    fn reroute_from_trigger(&mut self, to_b: bool) -> bool {
        let on_trigger = matches!(self.prev, Some((_, NodeKind::Trigger)));
        if on_trigger && self.prev_trigger_has_b {
            self.route_b = to_b;
            return true;
        }
        false
    }

    fn begin_else(&mut self) {
        if matches!(self.prev, Some((_, NodeKind::Condition))) {
            self.else_branch = true;
        } else {
            log::warn!("flow compile: `else` not directly after a condition, ignored");
        }
    }

    fn end_else(&mut self) {
        if let Some(condition) = self.governing_condition {
            self.prev = Some((condition, NodeKind::Condition));
            self.else_branch = false;
        }
    }

    fn finish(self) -> Vec<NodeId> {
        self.chain
    }
}

/// Error walking a chain back to DSL text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecompileError {
    #[error("chain references missing node {0}")]
    MissingNode(NodeId),
    #[error("cannot decompile branching at node {0}")]
    Branching(NodeId),
    #[error("cannot decompile cascading conditionals at node {0}")]
    CascadingConditional(NodeId),
    #[error("chain exceeds {MAX_CHAIN_LEN} nodes, assuming a cycle")]
    ChainTooDeep,
    #[error("no edge to follow out of node {0}")]
    AmbiguousEdge(NodeId),
}

/// Walk a chain starting at `start` and render it back to DSL text.
///
/// Inverse of [`compile`] for linear chains (keyword case and connector
/// spelling are normalized). Branching graphs that the statement form
/// cannot express are reported as typed errors.
pub fn decompile(start: NodeId, flows: &Flows) -> Result<String, DecompileError> {
    decompile_inner(start, flows, 0)
}

fn decompile_inner(start: NodeId, flows: &Flows, depth: usize) -> Result<String, DecompileError> {
    let mut pieces: Vec<String> = Vec::new();
    let mut ids: Vec<NodeId> = Vec::new();
    let mut current = Some(start);

    while let Some(id) = current {
        let node = flows.node(id).ok_or(DecompileError::MissingNode(id))?;
        ids.push(id);
        if depth + ids.len() > MAX_CHAIN_LEN {
            return Err(DecompileError::ChainTooDeep);
        }

        let children = node.children();
        let terminals = node.children_terminal();

        if children.len() > 2 || (children.len() > 1 && node.kind != NodeKind::Condition) {
            return Err(DecompileError::Branching(id));
        }
        if children.len() == 2 && terminals[0] == terminals[1] {
            return Err(DecompileError::Branching(id));
        }

        pieces.push(render_clause(node, &ids, flows, depth)?);

        current = match node.kind {
            // A loop clause always ends the statement.
            NodeKind::Loop => None,
            NodeKind::Trigger => match (children.first(), terminals.first()) {
                (Some(&child), Some(&true)) => {
                    pieces.push("with b".to_string());
                    Some(child)
                }
                (Some(&child), Some(&false)) => Some(child),
                _ => None,
            },
            NodeKind::Condition => {
                // Main chain leaves on the gated edge; the else side was
                // rendered inside the clause.
                children
                    .iter()
                    .zip(terminals)
                    .find(|&(_, &terminal)| terminal)
                    .map(|(&child, _)| child)
            }
            _ => match (children.first(), terminals.first()) {
                (Some(&child), Some(&false)) => Some(child),
                (Some(_), Some(&true)) => return Err(DecompileError::AmbiguousEdge(id)),
                _ => None,
            },
        };
    }

    Ok(pieces.join(" then "))
}

fn render_clause(
    node: &FlowNode,
    ids: &[NodeId],
    flows: &Flows,
    depth: usize,
) -> Result<String, DecompileError> {
    let clause = match node.kind {
        NodeKind::Trigger => {
            let word = node
                .trigger_kind()
                .map_or("?", TriggerKind::word);
            format!("on {word}")
        }
        NodeKind::Condition => {
            let word = node.condition_kind().map_or("?", ConditionKind::word);
            let mut text = format!("if {word}");
            if node.target_type == TargetType::Number && node.operator != Operator::None {
                text.push(' ');
                text.push_str(node.operator.symbol());
            }
            if let Some(value) = render_target(node) {
                text.push(' ');
                text.push_str(&value);
            }

            // Render the else side inline, the way the statement reads.
            let else_child = node
                .children()
                .iter()
                .zip(node.children_terminal())
                .find(|&(_, &terminal)| !terminal)
                .map(|(&child, _)| child);
            if let Some(child) = else_child {
                let else_text = decompile_inner(child, flows, depth + ids.len())?;
                if else_text.contains("if ") {
                    return Err(DecompileError::CascadingConditional(node.id));
                }
                text.push_str(&format!(" else {else_text} endelse"));
            }
            text
        }
        NodeKind::Action => {
            let word = node.action_kind().map_or("?", ActionKind::word);
            match render_target(node) {
                Some(value) => format!("do {word} {value}"),
                None => format!("do {word}"),
            }
        }
        NodeKind::Context => match node.context_kind() {
            Some(ContextKind::Subject) => "with a".to_string(),
            Some(ContextKind::B) => "with b".to_string(),
            _ => match render_target(node) {
                Some(value) => format!("with {value}"),
                None => "with".to_string(),
            },
        },
        NodeKind::Wait => {
            format!("wait {}", format_number(node.target.as_number()))
        }
        NodeKind::Loop => {
            // Recover the rewind distance from the loop child's position
            // in the chain walked so far.
            let steps = node
                .children()
                .first()
                .and_then(|child| ids.iter().position(|&id| id == *child))
                .map_or(0, |position| ids.len() - position - 2);
            let count = node.target.as_number();
            let count_text = if count == 0.0 {
                "infinite".to_string()
            } else {
                format_number(count)
            };
            format!("rewind {steps} repeat {count_text}")
        }
    };
    Ok(clause)
}

fn render_target(node: &FlowNode) -> Option<String> {
    match node.target_type {
        TargetType::None => None,
        TargetType::Tag => {
            let tag = node.target.as_tag();
            Some(match tag.name() {
                Some(name) => name.to_string(),
                None => tag.raw().to_string(),
            })
        }
        TargetType::Text => node.target.as_text().map(|text| format!("\"{text}\"")),
        TargetType::Number | TargetType::State => {
            Some(format_number(node.target.as_number()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::node::TriggerKind;

    fn kinds(flows: &Flows, chain: &[NodeId]) -> Vec<NodeKind> {
        chain
            .iter()
            .filter_map(|&id| flows.node(id))
            .map(|node| node.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_respects_quotes() {
        let tokens = tokenize(r#"do showText "well done hero""#);
        assert_eq!(tokens, vec!["do", "showText", "\"well done hero\""]);
    }

    #[test]
    fn test_compile_attack_chain() {
        let mut flows = Flows::new();
        let chain = compile(
            "ON near THEN IF bTagged player THEN DO attackB THEN WAIT 0.5 THEN WAIT 2.6",
            &mut flows,
            true,
            Some(ItemId(42)),
        );

        assert_eq!(
            kinds(&flows, &chain),
            vec![
                NodeKind::Trigger,
                NodeKind::Condition,
                NodeKind::Action,
                NodeKind::Wait,
                NodeKind::Wait,
            ]
        );

        let trigger = flows.node(chain[0]).unwrap();
        assert_eq!(trigger.trigger_kind(), Some(TriggerKind::Near));
        assert_eq!(trigger.owner, Some(ItemId(42)));

        let condition = flows.node(chain[1]).unwrap();
        assert_eq!(condition.condition_kind(), Some(ConditionKind::BTagged));
        assert_eq!(condition.target.as_tag(), Tag::PLAYER);
        assert_eq!(condition.operator, Operator::Equals);

        let action = flows.node(chain[2]).unwrap();
        assert_eq!(action.action_kind(), Some(ActionKind::AttackB));

        assert_eq!(flows.node(chain[3]).unwrap().target.as_number(), 0.5);
        assert_eq!(flows.node(chain[4]).unwrap().target.as_number(), 2.6);
    }

    #[test]
    fn test_compile_edge_terminals() {
        let mut flows = Flows::new();
        let chain = compile(
            "on near then if bTagged player then do attackB then wait 0.5",
            &mut flows,
            true,
            Some(ItemId(1)),
        );

        // Trigger -> condition: plain continuation.
        let trigger = flows.node(chain[0]).unwrap();
        assert_eq!(trigger.children_terminal(), &[false]);

        // Condition -> action: gated on success.
        let condition = flows.node(chain[1]).unwrap();
        assert_eq!(condition.children_terminal(), &[true]);

        // Action -> wait: plain continuation.
        let action = flows.node(chain[2]).unwrap();
        assert_eq!(action.children_terminal(), &[false]);
    }

    #[test]
    fn test_compile_with_b_reroutes_trigger() {
        let mut flows = Flows::new();
        let chain = compile(
            "ON collision IF bTagged player THEN WITH B THEN DO changeHealth 25",
            &mut flows,
            true,
            Some(ItemId(9)),
        );

        // with B after a condition emits a context node.
        assert_eq!(
            kinds(&flows, &chain),
            vec![NodeKind::Trigger, NodeKind::Condition, NodeKind::Context, NodeKind::Action]
        );

        let mut flows = Flows::new();
        let chain = compile(
            "ON collision WITH B THEN DO changeHealth -5 THEN WAIT 1",
            &mut flows,
            true,
            Some(ItemId(9)),
        );

        // Directly after a two-terminal trigger it reroutes instead.
        assert_eq!(
            kinds(&flows, &chain),
            vec![NodeKind::Trigger, NodeKind::Action, NodeKind::Wait]
        );
        let trigger = flows.node(chain[0]).unwrap();
        assert_eq!(trigger.children_terminal(), &[true]);

        let action = flows.node(chain[1]).unwrap();
        assert_eq!(action.target.as_number(), -5.0);
    }

    #[test]
    fn test_compile_goto_chain() {
        let mut flows = Flows::new();
        let chain = compile(
            "ON near THEN IF bTagged player THEN DO GOTO 2 THEN DO attackB THEN WAIT 0.5 THEN DO GOTO 1 THEN WAIT 2.6",
            &mut flows,
            true,
            Some(ItemId(3)),
        );

        assert_eq!(chain.len(), 7);
        let goto = flows.node(chain[2]).unwrap();
        assert_eq!(goto.action_kind(), Some(ActionKind::Goto));
        assert_eq!(goto.target_type, TargetType::State);
        assert_eq!(goto.target.as_number(), 2.0);
    }

    #[test]
    fn test_compile_condition_operator() {
        let mut flows = Flows::new();
        let chain = compile(
            "on frame then if health < 50 then do defend",
            &mut flows,
            true,
            Some(ItemId(2)),
        );

        let condition = flows.node(chain[1]).unwrap();
        assert_eq!(condition.condition_kind(), Some(ConditionKind::Health));
        assert_eq!(condition.operator, Operator::LessThan);
        assert_eq!(condition.target.as_number(), 50.0);
    }

    #[test]
    fn test_compile_else_branch() {
        let mut flows = Flows::new();
        let chain = compile(
            "on see then if bTagged player else do defend endelse then do followB",
            &mut flows,
            true,
            Some(ItemId(4)),
        );

        assert_eq!(chain.len(), 4);
        let condition = flows.node(chain[1]).unwrap();
        assert_eq!(condition.children().len(), 2);
        // else child rides the ungated edge, main chain the gated one.
        assert_eq!(condition.children_terminal(), &[false, true]);

        let else_action = flows.node(condition.children()[0]).unwrap();
        assert_eq!(else_action.action_kind(), Some(ActionKind::Defend));

        let main_action = flows.node(condition.children()[1]).unwrap();
        assert_eq!(main_action.action_kind(), Some(ActionKind::FollowB));
    }

    #[test]
    fn test_compile_loop() {
        let mut flows = Flows::new();
        let chain = compile(
            "on start then do goto 1 then wait 1 then do goto 2 then wait 1 then rewind 3 repeat infinite",
            &mut flows,
            true,
            Some(ItemId(5)),
        );

        assert_eq!(chain.len(), 6);
        let loop_node = flows.node(chain[5]).unwrap();
        assert_eq!(loop_node.kind, NodeKind::Loop);
        assert_eq!(loop_node.target.as_number(), 0.0);
        // Rewinds three clauses back from its predecessor: the first goto.
        assert_eq!(loop_node.children(), &[chain[1]]);
    }

    #[test]
    fn test_compile_show_text() {
        let mut flows = Flows::new();
        let chain = compile(
            r#"on selected then do showText "you found the key""#,
            &mut flows,
            true,
            Some(ItemId(6)),
        );

        let action = flows.node(chain[1]).unwrap();
        assert_eq!(action.target.as_text(), Some("you found the key"));
    }

    #[test]
    fn test_compile_skips_garbage() {
        let mut flows = Flows::new();
        let chain = compile(
            "on blorp then frobnicate then do attackB",
            &mut flows,
            true,
            Some(ItemId(7)),
        );

        assert_eq!(kinds(&flows, &chain), vec![NodeKind::Action]);
    }

    #[test]
    fn test_compile_empty_statement() {
        let mut flows = Flows::new();
        assert!(compile("", &mut flows, true, None).is_empty());
        assert!(flows.is_empty());
    }

    #[test]
    fn test_compile_is_repeatable_across_owners() {
        let mut flows = Flows::new();
        let statement = "ON near THEN IF bTagged player THEN DO attackB";

        let first = compile(statement, &mut flows, true, Some(ItemId(1)));
        let second = compile(statement, &mut flows, true, Some(ItemId(2)));

        assert_eq!(flows.triggers_by_item(ItemId(1)), &[first[0]]);
        assert_eq!(flows.triggers_by_item(ItemId(2)), &[second[0]]);
        assert_eq!(flows.triggers_by_type(TriggerKind::Near).len(), 2);
    }

    #[test]
    fn test_decompile_round_trip() {
        let mut flows = Flows::new();
        let statement = "on near then if bTagged player then do attackB then wait 0.5 then wait 2.6";
        let chain = compile(statement, &mut flows, true, Some(ItemId(1)));

        let text = decompile(chain[0], &flows).unwrap();
        assert_eq!(text, statement);
    }

    #[test]
    fn test_decompile_with_b() {
        let mut flows = Flows::new();
        let statement = "on collision then with b then do changeHealth -5 then wait 1";
        let chain = compile(statement, &mut flows, true, Some(ItemId(1)));

        let text = decompile(chain[0], &flows).unwrap();
        assert_eq!(text, "on collision then with b then do changeHealth -5 then wait 1");
    }

    #[test]
    fn test_decompile_rejects_branching() {
        let mut flows = Flows::new();
        let trigger = flows.add_node(
            Some(ItemId(1)),
            NodeKind::Trigger,
            TriggerKind::Start.code(),
            Operator::None,
            TargetType::None,
            TargetValue::None,
        );
        for _ in 0..2 {
            let child = flows.add_node(
                Some(ItemId(1)),
                NodeKind::Action,
                ActionKind::Defend.code(),
                Operator::None,
                TargetType::None,
                TargetValue::None,
            );
            flows.add_child(trigger, child, false);
        }

        assert_eq!(
            decompile(trigger, &flows),
            Err(DecompileError::Branching(trigger))
        );
    }

    #[test]
    fn test_decompile_missing_node() {
        let flows = Flows::new();
        assert_eq!(
            decompile(NodeId(9), &flows),
            Err(DecompileError::MissingNode(NodeId(9)))
        );
    }

    #[test]
    fn test_decompile_cycle_capped() {
        let mut flows = Flows::new();
        let a = flows.add_node(
            Some(ItemId(1)),
            NodeKind::Action,
            ActionKind::Defend.code(),
            Operator::None,
            TargetType::None,
            TargetValue::None,
        );
        let b = flows.add_node(
            Some(ItemId(1)),
            NodeKind::Action,
            ActionKind::Defend.code(),
            Operator::None,
            TargetType::None,
            TargetValue::None,
        );
        flows.add_child(a, b, false);
        flows.add_child(b, a, false);

        assert_eq!(decompile(a, &flows), Err(DecompileError::ChainTooDeep));
    }
}
