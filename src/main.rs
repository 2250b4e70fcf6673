mod config;
mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info, warn};
use quiz::{
    controller::{QuizController, WelcomePolicy},
    session::{QuizSession, Session, StagedSession},
    QuestionBank,
};
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup},
};

type QuizDialogue = Dialogue<QuizSession, ErasedStorage<QuizSession>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type SessionStorage = std::sync::Arc<ErasedStorage<QuizSession>>;

const START_COMMAND: &str = "/start";
const TEXT_ONLY_TEXT: &str = "Please answer with a text message.";

#[tokio::main]
async fn main() -> HandlerResult {
    dotenv().ok();
    pretty_env_logger::init();

    let config = config::Config::from_env()?;
    info!("Starting quiz bot...");

    info!("Loading questions from {}", config.questions_path.display());
    let questions = Arc::new(QuestionBank::from_file(&config.questions_path)?);
    info!("Loaded {} questions", questions.len());

    if config.welcome_policy == WelcomePolicy::Legacy {
        warn!("Legacy welcome policy: the welcome message is repeated while the first question is pending");
    }
    let controller = Arc::new(QuizController::new(questions, config.welcome_policy));

    let bot = Bot::from_env();

    info!("Opening session storage at {}", config.db_path);
    let storage: SessionStorage = SqliteStorage::open(&config.db_path, Json).await?.erase();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<QuizSession>, QuizSession>()
            .branch(dptree::filter(|msg: Message| msg.text() == Some(START_COMMAND)).endpoint(start))
            .branch(dptree::endpoint(answer)),
    )
    .dependencies(dptree::deps![storage, controller])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

async fn start(
    controller: Arc<QuizController>,
    bot: Bot,
    dialogue: QuizDialogue,
    state: QuizSession,
    msg: Message,
) -> HandlerResult {
    info!("Chat {} started the quiz", msg.chat.id.0);

    let mut session = StagedSession::new(state);
    let responses = controller.start(&mut session);

    finish_turn(&controller, &bot, &dialogue, session, msg.chat.id, responses).await
}

async fn answer(
    controller: Arc<QuizController>,
    bot: Bot,
    dialogue: QuizDialogue,
    state: QuizSession,
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, TEXT_ONLY_TEXT).await?;
        return Ok(());
    };
    debug!("Chat {} answered {:?}", msg.chat.id.0, text);

    let mut session = StagedSession::new(state);
    let responses = controller.respond(text, &mut session);

    finish_turn(&controller, &bot, &dialogue, session, msg.chat.id, responses).await
}

/// Sends the turn's replies and writes back whatever the controller saved.
async fn finish_turn(
    controller: &QuizController,
    bot: &Bot,
    dialogue: &QuizDialogue,
    session: StagedSession,
    chat_id: ChatId,
    responses: Vec<String>,
) -> HandlerResult {
    let markup = options_keyboard(controller, &session);

    let last = responses.len().saturating_sub(1);
    for (i, text) in responses.into_iter().enumerate() {
        if i == last {
            bot.send_message(chat_id, text)
                .reply_markup(markup.clone())
                .await?;
        } else {
            bot.send_message(chat_id, text).await?;
        }
    }

    if let Some(state) = session.into_saved() {
        dialogue.update(state).await?;
    }
    Ok(())
}

fn options_keyboard(controller: &QuizController, session: &impl Session) -> ReplyMarkup {
    match controller.current_question(session) {
        Some(question) => ReplyMarkup::Keyboard(KeyboardMarkup::new(
            question
                .options
                .iter()
                .map(|option| vec![KeyboardButton::new(option.clone())])
                .collect::<Vec<_>>(),
        )),
        None => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}
