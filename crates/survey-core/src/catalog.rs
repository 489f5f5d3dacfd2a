//! Question catalog
//!
//! Ordered question definitions. The order drives the dashboard layout and
//! the CSV column order; the kind drives form merging and tabulation.

use serde::{Deserialize, Serialize};

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// One option (radio group)
    SingleChoice,
    /// Several options (checkbox group)
    MultiChoice,
    /// Free text
    Text,
}

/// One survey question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Form field name and record key
    pub key: String,
    /// Display title
    pub title: String,
    /// Answer kind
    pub kind: QuestionKind,
    /// Whether a submission must answer it
    pub required: bool,
}

impl Question {
    /// Create required question
    #[must_use]
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            required: true,
        }
    }

    /// Mark as optional
    #[inline]
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Whether answers are lists
    #[inline]
    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.kind == QuestionKind::MultiChoice
    }
}

/// Ordered set of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Create catalog from questions in display order
    #[inline]
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Questions in display order
    #[inline]
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Question keys in display order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.questions.iter().map(|q| q.key.as_str()).collect()
    }

    /// Look up a question
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    /// Whether `key` names a multi-select question
    #[must_use]
    pub fn is_multi_select(&self, key: &str) -> bool {
        self.get(key).is_some_and(Question::is_multi_select)
    }
}

impl Default for QuestionCatalog {
    /// The Fleur de Fruits market survey
    fn default() -> Self {
        use QuestionKind::{MultiChoice, SingleChoice, Text};

        Self::new(vec![
            Question::new("frequency", "1. 你日常购买鲜切水果或轻奢轻食的频率是？", SingleChoice),
            Question::new("considerations", "2. 你选择鲜切水果/轻奢轻食的核心考量因素是？", MultiChoice),
            Question::new("budget", "3. 你能接受的单次轻奢鲜切水果消费预算是？", SingleChoice),
            Question::new("scenarios", "4. 你购买鲜切水果/轻奢轻食的主要场景是？", MultiChoice),
            Question::new("interest", "5. 你对「法式鲜果花艺」这一轻奢生活概念的感兴趣程度是？", SingleChoice),
            Question::new("selling_points", "6. 以下品牌卖点中，最能吸引你选择Fleur de Fruits的是？", MultiChoice),
            Question::new("gift_scenarios", "7. 若推出「法式鲜果花束」伴手礼，你更倾向于在哪些场景选购？", MultiChoice),
            Question::new("store_style", "8. 你更偏爱哪种法式门店风格？", SingleChoice),
            Question::new("customization", "9. 你对法式鲜果花艺的定制化服务有哪些期待？", MultiChoice),
            Question::new("channels", "10. 你更倾向于通过哪些渠道了解高端轻食品牌？", MultiChoice),
            Question::new("online_services", "11. 若开通线上预订服务，你最关注的核心服务是？", MultiChoice),
            Question::new("expectations", "12. 对于Fleur de Fruits法式鲜果花艺工作室，你还有哪些期待或个性化需求？", Text)
                .optional(),
        ])
    }
}
