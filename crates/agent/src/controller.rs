//! Session controller
//!
//! Owns the stage machine and runs the per-submission pipeline:
//!
//! ```text
//! safety ─▶ append answer ─▶ extract ─▶ store ─▶ contact check
//!    │                                              │
//!  reject                     (≥ threshold answers) screening ─▶ disqualified ─▶ Results
//!                                                   │
//!                                              sufficiency ─▶ priority ─▶ Results
//!                                                   │
//!                                              next question
//! ```
//!
//! External failures never abort a turn; each step degrades to its policy
//! default and the failure is returned as a [`Notice`].

use std::sync::Arc;

use intake_config::{CallBudgets, DateContext, IntakeConfig, IntakeScript};
use intake_core::{LanguageModel, ModerationService, QuestionId, Role, Stage, Verdict};

use crate::closing::ClosingWriter;
use crate::disqualification::DisqualificationEvaluator;
use crate::error::{AgentError, Result};
use crate::extractor::StructuredExtractor;
use crate::outcome::{Disposition, Notice, TurnOutcome};
use crate::policy;
use crate::priority::PriorityAssessor;
use crate::questions::{ContactStatus, QuestionGenerator};
use crate::safety::{rejection_note, ContentSafetyFilter};
use crate::session::{DisqualificationSource, IntakeSession};
use crate::sufficiency::{KeywordSufficiency, SufficiencyStrategy};

pub struct IntakeController {
    safety: ContentSafetyFilter,
    extractor: StructuredExtractor,
    sufficiency: Arc<dyn SufficiencyStrategy>,
    screening: DisqualificationEvaluator,
    priority: PriorityAssessor,
    questions: QuestionGenerator,
    closing: ClosingWriter,
    script: IntakeScript,
    disqualification_threshold: usize,
}

impl IntakeController {
    pub fn new(
        config: &IntakeConfig,
        budgets: &CallBudgets,
        model: Arc<dyn LanguageModel>,
        moderation: Arc<dyn ModerationService>,
    ) -> Self {
        let specialties = config.firm.specialties.clone();
        Self {
            safety: ContentSafetyFilter::new(moderation, &config.safety),
            extractor: StructuredExtractor::new(model.clone(), budgets.extraction),
            sufficiency: Arc::new(KeywordSufficiency::new(config.sufficiency.clone())),
            screening: DisqualificationEvaluator::new(model.clone(), budgets.disqualification),
            priority: PriorityAssessor::new(model.clone(), budgets.priority, specialties.clone()),
            questions: QuestionGenerator::new(
                model.clone(),
                budgets.question,
                config.script.clone(),
                specialties,
            ),
            closing: ClosingWriter::new(model, budgets.closing, config.script.clone()),
            script: config.script.clone(),
            disqualification_threshold: config.disqualification_threshold,
        }
    }

    /// Replace the default keyword sufficiency policy
    pub fn with_sufficiency(mut self, strategy: Arc<dyn SufficiencyStrategy>) -> Self {
        self.sufficiency = strategy;
        self
    }

    pub fn script(&self) -> &IntakeScript {
        &self.script
    }

    /// `Welcome → Intake`; greets and asks the first question
    pub fn begin(&self, session: &mut IntakeSession) -> Result<()> {
        if session.stage() != Stage::Welcome {
            return Err(AgentError::InvalidStage {
                action: "start an evaluation",
                stage: session.stage(),
            });
        }
        session.transition_to(Stage::Intake)?;
        session.touch();

        let first = self
            .questions
            .scripted_question(session)
            .unwrap_or(self.script.name_question.as_str())
            .to_string();
        session.push_message(Role::Assistant, self.script.welcome.clone());
        session.push_message(Role::Assistant, first);

        tracing::info!(session_id = %session.id(), "intake started");
        Ok(())
    }

    /// Run one submission through the pipeline
    pub async fn submit(&self, session: &mut IntakeSession, text: &str) -> Result<TurnOutcome> {
        if session.stage() != Stage::Intake {
            return Err(AgentError::InvalidStage {
                action: "submit an answer",
                stage: session.stage(),
            });
        }

        if text.trim().is_empty() {
            return Ok(TurnOutcome::ignored());
        }
        let answer = text;
        session.touch();

        let mut notices = Vec::new();
        let date = DateContext::today();

        // Safety screen
        let (check, notice) = self.safety.check(answer).await;
        notices.extend(notice);
        if !check.safe {
            session.push_message(Role::System, rejection_note(&check.flagged_categories));
            tracing::info!(
                session_id = %session.id(),
                categories = ?check.flagged_categories,
                "submission rejected by safety screen"
            );
            return Ok(TurnOutcome {
                disposition: Disposition::Rejected {
                    categories: check.flagged_categories,
                    message: self.script.safety_rejection.clone(),
                },
                notices,
            });
        }

        // Store the answer against the question it replies to
        session.push_message(Role::User, answer);
        let question = session
            .last_assistant_message()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let question_id = QuestionId::from_question(&question);

        let (extracted, notice) = self.extractor.extract(answer, &question_id).await;
        notices.extend(notice);
        session.record_response(&question, answer, extracted.stored_value());

        if !session.contact_info_collected()
            && ContactStatus::from_responses(session.responses()).is_complete()
        {
            session.mark_contact_collected();
            tracing::info!(session_id = %session.id(), "contact details collected");
        }

        tracing::debug!(
            session_id = %session.id(),
            responses = session.response_count(),
            "answer stored"
        );

        // Screening
        if session.response_count() >= self.disqualification_threshold {
            let (verdict, notice) = self.screening.evaluate(session.responses(), &date).await;
            notices.extend(notice);
            let disqualified = verdict.disqualified;
            session.record_verdict(verdict, DisqualificationSource::Screening);
            if disqualified {
                self.conclude_disqualified(session, &date, &mut notices).await?;
                return Ok(TurnOutcome {
                    disposition: Disposition::Concluded { disqualified: true },
                    notices,
                });
            }
        }

        // Sufficiency and scoring. Contact details are required whatever the strategy says.
        let report = self.sufficiency.assess(session);
        if session.contact_info_collected() && report.is_sufficient() {
            tracing::info!(
                session_id = %session.id(),
                categories = ?report.matched_categories,
                "enough information gathered"
            );
            let (score, notice) = self.priority.assess(session.responses(), &date).await;
            notices.extend(notice);
            let unlikely = score.is_unlikely();
            session.set_case_priority(score.clone());

            if unlikely {
                session.record_verdict(
                    policy::low_priority_verdict(),
                    DisqualificationSource::LowPriority,
                );
                self.conclude_disqualified(session, &date, &mut notices).await?;
                return Ok(TurnOutcome {
                    disposition: Disposition::Concluded { disqualified: true },
                    notices,
                });
            }

            session.transition_to(Stage::Results)?;
            let (message, notice) = self.closing.qualification_summary(session, &score, &date).await;
            notices.extend(notice);
            session.set_closing_message(message);
            tracing::info!(
                session_id = %session.id(),
                priority = %score.priority_level,
                "intake concluded"
            );
            return Ok(TurnOutcome {
                disposition: Disposition::Concluded { disqualified: false },
                notices,
            });
        }

        // Keep asking
        let (next, notice) = self.questions.next_question(session, &date).await;
        notices.extend(notice);
        session.push_message(Role::Assistant, next);

        Ok(TurnOutcome {
            disposition: Disposition::Continued,
            notices,
        })
    }

    /// `Results → Intake` with a fresh session
    pub fn restart(&self, session: &mut IntakeSession) -> Result<()> {
        if session.stage() != Stage::Results {
            return Err(AgentError::InvalidStage {
                action: "restart",
                stage: session.stage(),
            });
        }
        session.clear();
        tracing::info!(session_id = %session.id(), "evaluation restarted");
        self.begin(session)
    }

    /// `Intake | Results → Welcome` with a fresh session
    pub fn exit(&self, session: &mut IntakeSession) -> Result<()> {
        if !session.stage().can_transition_to(Stage::Welcome) {
            return Err(AgentError::InvalidStage {
                action: "exit",
                stage: session.stage(),
            });
        }
        session.clear();
        tracing::info!(session_id = %session.id(), "evaluation exited");
        Ok(())
    }

    async fn conclude_disqualified(
        &self,
        session: &mut IntakeSession,
        date: &DateContext,
        notices: &mut Vec<Notice>,
    ) -> Result<()> {
        session.transition_to(Stage::Results)?;
        let verdict: Verdict = session.disqualification_reason().cloned().unwrap_or_default();
        let (message, notice) = self
            .closing
            .disqualification_message(session, &verdict, date)
            .await;
        notices.extend(notice);
        session.set_closing_message(message);
        tracing::info!(
            session_id = %session.id(),
            disqualifier_type = verdict.disqualifier_type.as_str(),
            source = ?session.disqualification_source(),
            "intake concluded as disqualified"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_llm::{MockLanguageModel, MockModeration};

    fn controller() -> IntakeController {
        IntakeController::new(
            &IntakeConfig::default(),
            &CallBudgets::default(),
            Arc::new(MockLanguageModel::new()),
            Arc::new(MockModeration::clean()),
        )
    }

    #[test]
    fn test_begin_seeds_greeting_and_name_question() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        controller.begin(&mut session).unwrap();

        assert_eq!(session.stage(), Stage::Intake);
        let contents: Vec<_> = session.transcript().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[1], "What is your full name?");
        assert!(session.transcript().iter().all(|m| m.role == Role::Assistant));
    }

    #[test]
    fn test_begin_twice_is_invalid() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        controller.begin(&mut session).unwrap();
        assert!(matches!(
            controller.begin(&mut session),
            Err(AgentError::InvalidStage { stage: Stage::Intake, .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_outside_intake_is_invalid() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        let err = controller.submit(&mut session, "hello").await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidStage { stage: Stage::Welcome, .. }));
    }

    #[tokio::test]
    async fn test_blank_submission_ignored() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        controller.begin(&mut session).unwrap();
        let outcome = controller.submit(&mut session, "   \n").await.unwrap();
        assert_eq!(outcome, TurnOutcome::ignored());
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_answer_stored_as_submitted() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        controller.begin(&mut session).unwrap();

        let outcome = controller.submit(&mut session, "  Jane Doe \n").await.unwrap();
        assert_eq!(outcome.disposition, Disposition::Continued);

        let record = session.responses().values().next().unwrap();
        assert_eq!(record.answer, "  Jane Doe \n");
        assert_eq!(record.extracted_value.as_deref(), Some("  Jane Doe \n"));
        assert_eq!(session.visible_transcript().last().unwrap().content, "  Jane Doe \n");
    }

    #[test]
    fn test_restart_requires_results() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        controller.begin(&mut session).unwrap();
        assert!(controller.restart(&mut session).is_err());
    }

    #[test]
    fn test_exit_from_intake_clears() {
        let controller = controller();
        let mut session = IntakeSession::with_id("s");
        assert!(controller.exit(&mut session).is_err());

        controller.begin(&mut session).unwrap();
        controller.exit(&mut session).unwrap();
        assert_eq!(session.stage(), Stage::Welcome);
        assert!(session.transcript().is_empty());
        assert_eq!(session.id(), "s");
    }
}
