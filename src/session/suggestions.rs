/// A canned prompt offered before the first exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const SUGGESTIONS: &[Suggestion] = &[
    Suggestion {
        label: "Investment advice",
        prompt: "What are some good investment options for beginners?",
    },
    Suggestion {
        label: "Create budget",
        prompt: "Help me create a monthly budget plan",
    },
    Suggestion {
        label: "Market insights",
        prompt: "What are the current market trends?",
    },
    Suggestion {
        label: "Save money",
        prompt: "How can I save more money each month?",
    },
];
