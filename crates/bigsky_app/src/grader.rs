use bigsky_domain::{
    AssistantId, ChatCompletion, Error, FailureKind, Outcome, PreviousGrade, ToolCall, ToolName,
    ToolNameResolver, Verdict,
};

/// What a case expects from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Expectation {
    pub assistant: AssistantId,
    /// Already alias-resolved
    pub tool: ToolName,
    pub previous_grade: PreviousGrade,
    /// `'<query>' should call '<tool>'`
    pub message: String,
}

impl Expectation {
    pub fn message(query: &str, tool: &ToolName) -> String {
        format!("'{query}' should call '{tool}'")
    }
}

/// Classified response, with the line and outcome it is recorded under
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub verdict: Verdict,
    pub message: String,
    pub outcome: Outcome,
    /// Comparable name of the called tool, `change_assistant:<target>` for
    /// hand-overs
    pub actual_tool: Option<ToolName>,
    pub tool_call: Option<ToolCall>,
}

pub struct Grader<'a> {
    resolver: &'a ToolNameResolver,
}

impl<'a> Grader<'a> {
    pub fn new(resolver: &'a ToolNameResolver) -> Self {
        Self { resolver }
    }

    pub fn grade(&self, expectation: &Expectation, response: &ChatCompletion) -> Grade {
        let message = &expectation.message;

        let Some(tool_call) = response.first_tool_call() else {
            return if expectation.previous_grade == PreviousGrade::Reply {
                Grade {
                    verdict: Verdict::UnexpectedReply,
                    message: format!(
                        "Expected Error:{message}, got 'Reply:{}'",
                        response.reply_text()
                    ),
                    outcome: Outcome::warning("Backend replied instead of calling a tool"),
                    actual_tool: None,
                    tool_call: None,
                }
            } else {
                Grade {
                    verdict: Verdict::NoToolCalled,
                    message: message.clone(),
                    outcome: Outcome::failure(FailureKind::ToolNotCalled, Error::ToolNotCalled),
                    actual_tool: None,
                    tool_call: None,
                }
            };
        };

        let actual = self.comparable_name(&expectation.assistant, &tool_call);
        tracing::debug!(expected = %expectation.tool, actual = %actual, "Grading tool call");

        let (verdict, message, outcome) = match (actual == expectation.tool, expectation.previous_grade) {
            (true, PreviousGrade::Error) => {
                (Verdict::Improved, format!("IMPROVED: {message}"), Outcome::Pass)
            }
            (true, _) => (Verdict::Pass, message.clone(), Outcome::Pass),
            (false, PreviousGrade::Ok) => (
                Verdict::Regression,
                format!("{message}, got '{actual}'"),
                Outcome::failure(
                    FailureKind::WrongTool,
                    Error::WrongTool { expected: expectation.tool.clone(), actual: actual.clone() },
                ),
            ),
            (false, PreviousGrade::Error | PreviousGrade::Reply) => (
                Verdict::WrongToolExpectedError,
                format!("Expected Error:{message}, got '{actual}'"),
                Outcome::warning("Called wrong tool, as previously graded"),
            ),
        };

        Grade { verdict, message, outcome, actual_tool: Some(actual), tool_call: Some(tool_call) }
    }

    fn comparable_name(&self, assistant: &AssistantId, tool_call: &ToolCall) -> ToolName {
        let resolved = self.resolver.resolve(assistant, &tool_call.name);
        if resolved.is_change_assistant() {
            ToolName::change_assistant(&tool_call.target_assistant())
        } else {
            resolved
        }
    }
}
