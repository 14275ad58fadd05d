//! Interactive chat loop
//!
//! Line-oriented stand-in for the dashboard's interaction panel: select an
//! agent, send text or a website/instructions pair, and answer the agent's
//! multiple-choice follow-up. Replies arrive asynchronously and are printed
//! by an event subscriber, like the toast notices in the original UI.

use anyhow::Result;
use scrapedeck_core::{
    InteractionController, InteractionEvent, Message, Originator, UserFriendlyError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

pub async fn run(controller: InteractionController) -> Result<()> {
    println!("Scrapedeck console. /help for commands.");

    let mut events = controller.events().subscribe();
    let printer = controller.clone();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&printer, &event).await,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut selected: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();

        match command {
            "/help" => print_help(),
            "/quit" | "/exit" => break,
            "/agents" => {
                for agent in controller.registry().list() {
                    let marker = if selected.as_deref() == Some(agent.id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{} {:<10} {} ({})", marker, agent.id, agent.name, agent.status);
                }
            }
            "/use" => match controller.select_agent(rest).await {
                Ok(messages) => {
                    selected = Some(rest.to_string());
                    for message in &messages {
                        print_message(message);
                    }
                }
                Err(error) => print_error(&error),
            },
            "/scrape" => {
                let mut args = rest.splitn(2, ' ');
                let website = args.next().unwrap_or_default();
                let instructions = args.next().unwrap_or_default();
                if let Err(error) = controller
                    .submit(selected.as_deref(), "", website, instructions)
                    .await
                {
                    print_error(&error);
                }
            }
            "/choose" => {
                let mut args = rest.split_whitespace();
                let message_id = args.next().and_then(|s| s.parse::<u64>().ok());
                let key = args.next();
                match (message_id, key) {
                    (Some(message_id), Some(key)) => {
                        if let Err(error) = controller
                            .select_choice(selected.as_deref(), message_id, key)
                            .await
                        {
                            print_error(&error);
                        }
                    }
                    _ => println!("usage: /choose <message_id> <choice_key>"),
                }
            }
            "/cancel" => match selected.as_deref() {
                Some(agent_id) => {
                    if !controller.cancel_pending(agent_id).await {
                        println!("nothing pending for {}", agent_id);
                    }
                }
                None => println!("no agent selected"),
            },
            "/history" => match selected.as_deref() {
                Some(agent_id) => {
                    for message in controller.conversation(agent_id).await {
                        print_message(&message);
                    }
                }
                None => println!("no agent selected"),
            },
            _ => {
                // Anything else is a plain text submission
                if let Err(error) = controller.submit(selected.as_deref(), &line, "", "").await {
                    print_error(&error);
                }
            }
        }
    }

    Ok(())
}

async fn print_event(controller: &InteractionController, event: &InteractionEvent) {
    match event {
        InteractionEvent::ResponsePending { .. } => println!("  agent is working..."),
        InteractionEvent::ResponseArrived { agent_id, message_id } => {
            let messages = controller.conversation(agent_id).await;
            if let Some(message) = messages.iter().find(|m| m.id == *message_id) {
                print_message(message);
            }
        }
        InteractionEvent::ResponseCancelled { agent_id } => {
            println!("  pending response for {} cancelled", agent_id);
        }
        _ => {
            if let Some(notice) = event.notice() {
                println!("  {}", notice);
            }
        }
    }
}

fn print_message(message: &Message) {
    let who = match message.originator {
        Originator::User => "you",
        Originator::Agent => "agent",
    };
    println!("[{}] {:>5} #{}: {}", message.timestamp, who, message.id, message.content);
    if let Some(choices) = &message.choices {
        for choice in choices.iter() {
            let marker = if message.selected_choice.as_deref() == Some(choice.key.as_str()) {
                ">"
            } else {
                " "
            };
            println!("    {} {}: {}", marker, choice.key, choice.text);
        }
    }
}

fn print_error(error: &scrapedeck_core::Error) {
    println!("  {}", error.user_message());
    if let Some(suggestion) = error.suggestion() {
        println!("  {}", suggestion);
    }
}

fn print_help() {
    println!("  /agents                      list agents");
    println!("  /use <agent_id>              select an agent");
    println!("  <text>                       send a message to the selected agent");
    println!("  /scrape <url> [instructions] submit a scrape request");
    println!("  /choose <message_id> <key>   answer a multiple-choice prompt");
    println!("  /cancel                      cancel the pending response");
    println!("  /history                     reprint the conversation");
    println!("  /quit                        exit");
}
