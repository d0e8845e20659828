//! Thought Engine: turns observations into structured reasoning artifacts.
//! Holds no state about the current task — every method is a pure
//! function of its inputs, so the ReAct Loop can call it freely without
//! worrying about ordering beyond what each signature already implies.

use std::sync::Arc;

use crate::action::{Action, ActionStatus};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::observation::Observation;
use crate::thought::{Decision, Phase, PlannedStep, Thought, ThoughtType};
use crate::tool::ToolDescriptor;

/// Closed set of coarse intents the rule-based classifier and the LLM
/// prompt both draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    CityRecommendation,
    AttractionQuery,
    RoutePlanning,
    PreferenceUpdate,
    GeneralChat,
}

impl Intent {
    fn as_str(self) -> &'static str {
        match self {
            Intent::CityRecommendation => "city_recommendation",
            Intent::AttractionQuery => "attraction_query",
            Intent::RoutePlanning => "route_planning",
            Intent::PreferenceUpdate => "preference_update",
            Intent::GeneralChat => "general_chat",
        }
    }
}

/// Keyword-based intent classifier, used when the LLM call fails or
/// returns something unparseable. Always succeeds, defaulting to
/// `GeneralChat` when nothing else matches.
fn classify_intent(user_input: &str) -> Intent {
    let lower = user_input.to_lowercase();
    const CITY: &[&str] = &["recommend", "city", "cities", "推荐", "城市"];
    const ATTRACTION: &[&str] = &["attraction", "see", "sight", "景点"];
    const ROUTE: &[&str] = &["route", "itinerary", "日游", "规划", "行程"];
    const PREFERENCE: &[&str] = &["prefer", "budget", "偏好"];

    if CITY.iter().any(|k| lower.contains(k)) {
        Intent::CityRecommendation
    } else if ROUTE.iter().any(|k| lower.contains(k)) {
        Intent::RoutePlanning
    } else if ATTRACTION.iter().any(|k| lower.contains(k)) {
        Intent::AttractionQuery
    } else if PREFERENCE.iter().any(|k| lower.contains(k)) {
        Intent::PreferenceUpdate
    } else {
        Intent::GeneralChat
    }
}

pub struct ThoughtEngine {
    llm: Arc<dyn LlmClient>,
}

impl ThoughtEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// ANALYSIS / UNDERSTANDING. Asks the LLM for a one-word intent
    /// classification; falls back to [`classify_intent`] if the call
    /// fails or the response doesn't match a known intent, so this
    /// method never returns an error.
    pub async fn analyze_task(&self, user_input: &str, context: &[Message]) -> Thought {
        let prompt = format!(
            "Classify the user's request into exactly one of: city_recommendation, \
             attraction_query, route_planning, preference_update, general_chat. \
             Respond with only the label.\n\nRequest: {user_input}"
        );
        let mut messages = context.to_vec();
        messages.push(Message::user(prompt));

        let intent = match self.llm.invoke(&messages).await {
            Ok(response) => parse_intent(&response.content).unwrap_or_else(|| classify_intent(user_input)),
            Err(_) => classify_intent(user_input),
        };

        Thought::new(
            ThoughtType::Analysis,
            Phase::Understanding,
            format!("intent={}", intent.as_str()),
            0.6,
        )
    }

    /// PLANNING. Asks the LLM to emit an ordered list of `(tool, params)`
    /// steps given the analysis and the tools currently registered. A
    /// plan that fails to parse becomes an empty plan, which the loop
    /// treats as "answer directly" per its tie-break rule.
    pub async fn plan_actions(&self, analysis: &Thought, registry_view: &[ToolDescriptor]) -> Thought {
        let tool_list = registry_view
            .iter()
            .map(|t| format!("- {} ({}): {}", t.name, t.required_params.join(", "), t.description))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Given this analysis: {}\nAvailable tools:\n{}\n\n\
             Reply with a JSON array of steps, each {{\"tool\": name, \"params\": {{...}}}}. \
             Reply with [] if no tool is needed.",
            analysis.content, tool_list
        );

        let steps = match self.llm.invoke(&[Message::user(prompt)]).await {
            Ok(response) => parse_plan(&response.content).unwrap_or_default(),
            Err(_) => Vec::new(),
        };

        let decision = if steps.is_empty() {
            Decision::default()
        } else {
            let mut remaining = steps;
            let next = remaining.remove(0);
            Decision { next: Some(next), remaining }
        };

        let confidence = if decision.next.is_some() { 0.7 } else { 0.5 };
        Thought::new(ThoughtType::Planning, Phase::Planning, "plan produced", confidence).with_decision(decision)
    }

    /// INFERENCE / EXECUTION. Synchronous summary of the last observation;
    /// no LLM call is needed to restate what just happened. `next` is the
    /// step the loop's own pending-plan queue decided on, if any; the
    /// engine only narrates it, it never chooses it.
    pub fn observe_infer(&self, observation: &Observation, prior_confidence: f32, next: Option<PlannedStep>) -> Thought {
        let (summary, confidence) = match &observation.last_action_result {
            Some(action) if action.status == ActionStatus::Success => {
                (format!("step {}: '{}' succeeded", observation.step, action.tool_name), (prior_confidence + 0.1).min(1.0))
            }
            Some(action) => {
                (format!("step {}: '{}' did not succeed", observation.step, action.tool_name), (prior_confidence - 0.1).max(0.0))
            }
            None => (format!("step {}: no action yet", observation.step), prior_confidence),
        };
        let mut thought = Thought::new(ThoughtType::Inference, Phase::Execution, summary, confidence);
        if let Some(next) = next {
            thought = thought.with_decision(Decision { next: Some(next), remaining: vec![] });
        }
        thought
    }

    /// REFLECTION / EXECUTION, emitted after a tool fails so the next
    /// iteration can revise its plan instead of repeating the same call.
    pub fn reflect(&self, failed_action: &Action, next: Option<PlannedStep>) -> Thought {
        let content = format!(
            "'{}' {}; reconsidering the plan without repeating that call",
            failed_action.tool_name,
            failed_action.error.as_deref().unwrap_or("failed")
        );
        let mut thought = Thought::new(ThoughtType::Reflection, Phase::Execution, content, 0.4);
        if let Some(next) = next {
            thought = thought.with_decision(Decision { next: Some(next), remaining: vec![] });
        }
        thought
    }

    /// DECISION / GENERATION, emitted once the stop predicate is
    /// satisfied to mark the task ready to answer.
    pub fn decide(&self, confidence: f32) -> Thought {
        Thought::new(ThoughtType::Decision, Phase::Generation, "ready to answer", confidence)
    }
}

fn parse_intent(raw: &str) -> Option<Intent> {
    match raw.trim().trim_matches('"').to_lowercase().as_str() {
        "city_recommendation" => Some(Intent::CityRecommendation),
        "attraction_query" => Some(Intent::AttractionQuery),
        "route_planning" => Some(Intent::RoutePlanning),
        "preference_update" => Some(Intent::PreferenceUpdate),
        "general_chat" => Some(Intent::GeneralChat),
        _ => None,
    }
}

fn parse_plan(raw: &str) -> Option<Vec<PlannedStep>> {
    let trimmed = raw.trim();
    let json_slice = trimmed.find('[').zip(trimmed.rfind(']')).map(|(start, end)| &trimmed[start..=end])?;
    serde_json::from_str(json_slice).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    #[test]
    fn classify_intent_matches_route_planning_keywords() {
        assert_eq!(classify_intent("帮我规划北京3日游"), Intent::RoutePlanning);
    }

    #[test]
    fn classify_intent_defaults_to_general_chat() {
        assert_eq!(classify_intent("你好"), Intent::GeneralChat);
    }

    #[tokio::test]
    async fn analyze_task_falls_back_to_rule_based_when_llm_response_unparseable() {
        let llm = Arc::new(MockLlm::fixed("not a real intent"));
        let engine = ThoughtEngine::new(llm);
        let thought = engine.analyze_task("推荐适合美食游的城市", &[]).await;
        assert_eq!(thought.content, "intent=city_recommendation");
        assert_eq!(thought.thought_type, ThoughtType::Analysis);
        assert_eq!(thought.phase, Phase::Understanding);
    }

    #[tokio::test]
    async fn analyze_task_uses_llm_classification_when_valid() {
        let llm = Arc::new(MockLlm::fixed("route_planning"));
        let engine = ThoughtEngine::new(llm);
        let thought = engine.analyze_task("anything", &[]).await;
        assert_eq!(thought.content, "intent=route_planning");
    }

    #[tokio::test]
    async fn plan_actions_parses_json_steps_into_decision() {
        let llm = Arc::new(MockLlm::fixed(
            r#"Sure thing: [{"tool": "search_cities", "params": {"interests": ["food"]}}]"#,
        ));
        let engine = ThoughtEngine::new(llm);
        let analysis = Thought::new(ThoughtType::Analysis, Phase::Understanding, "intent=city_recommendation", 0.6);
        let thought = engine.plan_actions(&analysis, &[]).await;
        assert!(thought.has_tool_decision());
        let decision = thought.decision.unwrap();
        assert_eq!(decision.next.unwrap().tool, "search_cities");
        assert!(decision.remaining.is_empty());
    }

    #[tokio::test]
    async fn plan_actions_with_unparseable_response_yields_empty_decision() {
        let llm = Arc::new(MockLlm::fixed("I cannot help with that"));
        let engine = ThoughtEngine::new(llm);
        let analysis = Thought::new(ThoughtType::Analysis, Phase::Understanding, "intent=general_chat", 0.6);
        let thought = engine.plan_actions(&analysis, &[]).await;
        assert!(!thought.has_tool_decision());
    }

    #[test]
    fn observe_infer_raises_confidence_after_success() {
        let engine_llm = Arc::new(MockLlm::fixed(""));
        let engine = ThoughtEngine::new(engine_llm);
        let mut action = Action::pending("search_cities", serde_json::json!({}));
        action.start();
        action.succeed(serde_json::json!({"cities": ["Kyoto"]}));
        let observation = Observation {
            step: 1,
            history_summary: String::new(),
            last_action_result: Some(action),
            elapsed: std::time::Duration::from_secs(1),
        };
        let thought = engine.observe_infer(&observation, 0.6, None);
        assert!(thought.confidence > 0.6);
        assert_eq!(thought.thought_type, ThoughtType::Inference);
    }

    #[test]
    fn observe_infer_attaches_loop_supplied_next_step() {
        let engine = ThoughtEngine::new(Arc::new(MockLlm::fixed("")));
        let observation = Observation {
            step: 2,
            history_summary: String::new(),
            last_action_result: None,
            elapsed: std::time::Duration::from_secs(0),
        };
        let next = PlannedStep { tool: "get_attractions".into(), params: serde_json::json!({}) };
        let thought = engine.observe_infer(&observation, 0.6, Some(next));
        assert!(thought.has_tool_decision());
        assert_eq!(thought.decision.unwrap().next.unwrap().tool, "get_attractions");
    }

    #[test]
    fn reflect_produces_reflection_thought_mentioning_the_tool() {
        let engine = ThoughtEngine::new(Arc::new(MockLlm::fixed("")));
        let mut action = Action::pending("get_attractions", serde_json::json!({}));
        action.start();
        action.fail("execution_error: no data");
        let thought = engine.reflect(&action, None);
        assert_eq!(thought.thought_type, ThoughtType::Reflection);
        assert!(thought.content.contains("get_attractions"));
    }
}
