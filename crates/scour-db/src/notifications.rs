/// Queue an outbound notification. Delivery is somebody else's job: an
/// external mailer drains this table, so a row here is best-effort intent,
/// not a sent message.
pub async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (recipient, subject, body)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(recipient)
    .bind(subject)
    .bind(body)
    .execute(executor)
    .await?;
    Ok(())
}
