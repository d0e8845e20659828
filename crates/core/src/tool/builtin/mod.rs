//! Deterministic, in-memory travel tools. Stand-ins for the external
//! knowledge base the task treats as an opaque collaborator, so the
//! ReAct Loop and Mode Dispatcher are exercisable end-to-end without a
//! network dependency.

mod final_answer;
mod get_attractions;
mod plan_route;
mod search_cities;
mod update_preference;

pub use final_answer::FinalAnswerTool;
pub use get_attractions::GetAttractionsTool;
pub use plan_route::PlanRouteTool;
pub use search_cities::SearchCitiesTool;
pub use update_preference::UpdatePreferenceTool;

use crate::tool::ToolRegistry;

/// Registers all built-in travel tools. The convenience constructor most
/// callers (the CLI bootstrap, tests) reach for instead of registering
/// each tool by hand.
pub fn register_all(registry: &mut ToolRegistry) {
    registry.register(Box::new(SearchCitiesTool::new()));
    registry.register(Box::new(GetAttractionsTool::new()));
    registry.register(Box::new(PlanRouteTool));
    registry.register(Box::new(UpdatePreferenceTool));
    registry.register(Box::new(FinalAnswerTool));
}
