use crate::{
    db::users::Users,
    libs::{messages::Message, period::UserId, user::parse_iaf, view::View},
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Create a user, or return the one already linked to the Telegram id
    Add {
        name: String,
        #[arg(long)]
        telegram_id: Option<i64>,
    },
    /// Set the individual alpha frequency, 7-14 Hz
    Iaf {
        #[arg(short, long)]
        user: UserId,
        /// Value in Hz; a comma decimal separator is accepted
        value: String,
    },
    List,
}

pub fn cmd(args: UserArgs) -> Result<()> {
    let mut users = Users::new()?;
    match args.command {
        UserCommand::Add { name, telegram_id } => {
            let user = users.get_or_create(telegram_id, &name)?;
            msg_success!(Message::UserReady(user.id, user.name));
        }
        UserCommand::Iaf { user, value } => {
            // Fail on an unknown user before validating the value.
            users.get(user)?;
            match parse_iaf(&value) {
                Ok(iaf) => {
                    users.set_iaf(user, iaf)?;
                    msg_success!(Message::IafSaved(iaf));
                }
                Err(e) => msg_bail_anyhow!(Message::IafInvalid(e.to_string())),
            }
        }
        UserCommand::List => {
            let all = users.list()?;
            if all.is_empty() {
                msg_info!(Message::NoUsersFound);
            } else {
                View::users(&all)?;
            }
        }
    }
    Ok(())
}
