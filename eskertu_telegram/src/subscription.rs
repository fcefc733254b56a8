use std::sync::Arc;

use eskertu_models::subscriber::SubscriberAddress;
use eskertu_storage::{StorageError, SubscriberRegistry};
use teloxide::{
    RequestError, dptree::case, macros::BotCommands, prelude::*,
    utils::command::BotCommands as _,
};

type HandlerResult = anyhow::Result<()>;
type HandlerRegistry = Arc<dyn SubscriberRegistry>;

const SUBSCRIBE_FAILED_TEXT: &str =
    "Could not subscribe this chat right now. Please try /start again later.";
const USAGE_TEXT: &str = "Send /start to receive rent payment reminders in this chat.";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn reply_text(self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed => {
                "Bot activated. This chat will receive rent payment reminders."
            }
            SubscribeOutcome::AlreadySubscribed => {
                "This chat is already subscribed to rent payment reminders."
            }
        }
    }
}

pub async fn subscribe(
    registry: &dyn SubscriberRegistry,
    chat_id: SubscriberAddress,
) -> Result<SubscribeOutcome, StorageError> {
    let outcome = if registry.register(chat_id).await? {
        log::info!("Chat {chat_id} subscribed to reminders");
        SubscribeOutcome::Subscribed
    } else {
        SubscribeOutcome::AlreadySubscribed
    };

    Ok(outcome)
}

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum Command {
    #[command(description = "subscribe this chat to rent payment reminders.")]
    Start,
    #[command(description = "show this text.")]
    Help,
}

/// Listens for chat commands and turns `/start` into a registry write.
pub struct TelegramSubscriptionInterface;

impl TelegramSubscriptionInterface {
    pub async fn start(bot: Bot, registry: HandlerRegistry) {
        log::info!("Starting Telegram subscription interface");

        let schema = Update::filter_message()
            .branch(
                teloxide::filter_command::<Command, _>()
                    .branch(case![Command::Start].endpoint(start))
                    .branch(case![Command::Help].endpoint(help)),
            )
            .branch(dptree::endpoint(usage));

        Dispatcher::builder(bot, schema)
            .dependencies(dptree::deps![registry])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

async fn start(bot: Bot, msg: Message, registry: HandlerRegistry) -> HandlerResult {
    match subscribe(registry.as_ref(), msg.chat.id.0).await {
        Ok(outcome) => {
            bot.send_message(msg.chat.id, outcome.reply_text()).await?;
            Ok(())
        }
        Err(error) => {
            log::error!("Could not register chat {}: {error}", msg.chat.id);
            let reply = bot
                .send_message(msg.chat.id, SUBSCRIBE_FAILED_TEXT)
                .await
                .map(|_| ());
            Err(subscribe_failure(error, reply))
        }
    }
}

/// The storage error is what the handler reports, whether or not the apology reached the chat.
fn subscribe_failure(error: StorageError, reply: Result<(), RequestError>) -> anyhow::Error {
    if let Err(reply_error) = reply {
        log::warn!("Could not tell the chat that subscribing failed: {reply_error}");
    }
    error.into()
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

async fn usage(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, USAGE_TEXT).await?;
    Ok(())
}
