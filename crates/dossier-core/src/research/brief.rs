use serde::{Deserialize, Serialize};

use crate::research::classify::ClaimSet;

/// The output of one research run.
///
/// Sections appear in task order; citation ids referenced by the bullets
/// resolve through `citations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    /// The research question
    pub query: String,
    /// One section per sub-task
    pub sections: Vec<Section>,
    /// Overall conclusion from the final synthesis call
    pub conclusion: String,
    /// Caveats flagged by task summaries
    pub contradictions_and_uncertainties: Vec<String>,
    /// Sources in citation-id order
    pub citations: Vec<Citation>,
    /// Fact/opinion split of the bullet evidence, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claims: Option<ClaimSet>,
}

impl Brief {
    /// Converts the brief to markdown format.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Research Brief: {}\n\n", self.query));

        for section in &self.sections {
            md.push_str(&format!("## {}. {}\n\n", section.order, section.question));
            for bullet in &section.bullets {
                md.push_str(&format!("- {}\n", bullet));
            }
            if !section.bullets.is_empty() {
                md.push('\n');
            }
            md.push_str(section.content.trim());
            md.push_str("\n\n");
        }

        md.push_str("## Conclusion\n\n");
        md.push_str(self.conclusion.trim());
        md.push_str("\n\n");

        if !self.contradictions_and_uncertainties.is_empty() {
            md.push_str("## Contradictions and Uncertainties\n\n");
            for note in &self.contradictions_and_uncertainties {
                md.push_str(&format!("- {}\n", note));
            }
            md.push('\n');
        }

        if let Some(claims) = &self.claims {
            md.push_str("## Claims\n\n");
            md.push_str("### Facts\n\n");
            for claim in &claims.facts {
                md.push_str(&format!("- {} ({})\n", claim.claim, claim.url));
            }
            md.push_str("\n### Opinions\n\n");
            for claim in &claims.opinions {
                md.push_str(&format!("- {} ({})\n", claim.claim, claim.url));
            }
            md.push('\n');
        }

        md.push_str("## Citations\n\n");
        for citation in &self.citations {
            md.push_str(&format!(
                "{}. [{}]({}) ({})\n",
                citation.id, citation.title, citation.url, citation.domain
            ));
        }

        md
    }
}

/// The part of a brief covering one sub-task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the brief
    pub order: usize,
    pub task_id: String,
    /// The sub-question text
    pub question: String,
    /// Truncated task summary
    pub content: String,
    /// Cite-referencing evidence bullets
    pub bullets: Vec<String>,
}

/// A numbered source reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub id: usize,
    pub url: String,
    pub title: String,
    pub domain: String,
}
