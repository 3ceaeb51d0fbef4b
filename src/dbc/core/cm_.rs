use crate::dbc::core::syntax::{SyntaxNode, rules};
use crate::dbc::types::{database::DatabaseDBC, errors::SemanticError};

/// Attaches `CM_ BO_` and `CM_ SG_` comments to their message or signal.
///
/// Shapes:
/// `CM_ BO_ <MessageID> "Comment...";`
/// `CM_ SG_ <MessageID> <SignalName> "Comment...";`
///
/// Node, environment-variable and network comments are ignored; comments whose target does not
/// exist are dropped.
pub(crate) fn decode_all(db: &mut DatabaseDBC, root: &SyntaxNode) -> Result<(), SemanticError> {
    let Some(comments) = root.child(rules::COMMENTS) else {
        return Ok(());
    };

    for cm in comments.children_of(rules::COMMENT) {
        let to_message: bool = cm.child_text(rules::OBJECT_TYPE) == Some("BO_");
        let to_signal: bool = cm.child_text(rules::OBJECT_TYPE) == Some("SG_");
        if !to_message && !to_signal {
            continue;
        }

        let message_id: u32 = cm.require_number(rules::ID)?;
        let text: String = cm.require_text(rules::COMMENT_STRING)?.to_string();

        let Some(msg) = db.get_message_by_id_mut(message_id) else {
            tracing::debug!("comment for unknown message {} dropped", message_id);
            continue;
        };

        if to_message {
            tracing::trace!("comment -> message {}", msg.name);
            msg.comment = Some(text);
        } else {
            let signal_name: &str = cm.require_text(rules::NAME)?;
            match msg.get_signal_by_name_mut(signal_name) {
                Some(sig) => {
                    tracing::trace!("comment -> signal {}:{}", message_id, signal_name);
                    sig.comment = Some(text);
                }
                None => {
                    tracing::debug!(
                        "comment for unknown signal {}:{} dropped",
                        message_id,
                        signal_name
                    );
                }
            }
        }
    }
    Ok(())
}
