//! Plain-text rendering of command results.

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use arcube_console::orders::{
    Order, OrderPage, OrderStatus, OrderWithProducts, Pagination, Product, StatusCounts,
};
use arcube_console::route::Route;
use arcube_console::session::User;
use arcube_console::webhooks::{TestWebhookResult, Webhook, WebhookDelivery, WebhookStats};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M UTC";

pub fn user<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    writeln!(out, "Signed in as {} ({})", user.email, user.role)?;
    if let Some(name) = &user.name {
        writeln!(out, "  Name:        {name}")?;
    }
    writeln!(out, "  User id:     {}", user.id)?;
    if !user.permissions.is_empty() {
        let permissions: Vec<_> = user.permissions.iter().map(String::as_str).collect();
        writeln!(out, "  Permissions: {}", permissions.join(", "))?;
    }
    let mut menu = vec![Route::Orders];
    if user.role.can_view_dashboard() {
        menu.push(Route::Dashboard);
    }
    if user.role.can_manage_webhooks() {
        menu.push(Route::Webhooks);
    }
    menu.push(Route::Profile);
    let menu: Vec<_> = menu.iter().map(ToString::to_string).collect();
    writeln!(out, "  Views:       {}", menu.join(" "))
}

fn order_line<W: Write>(out: &mut W, order: &Order) -> io::Result<()> {
    let total = order
        .total()
        .map_or_else(|| "-".to_string(), |money| money.to_string());
    writeln!(
        out,
        "{:<26} {:<8} {:<10} {:<24} {:>14}  {}",
        order.id,
        order.pnr,
        order.status,
        order.customer.full_name(),
        total,
        order.created_at.format("%Y-%m-%d"),
    )
}

fn product_line<W: Write>(out: &mut W, product: &Product, now: DateTime<Utc>) -> io::Result<()> {
    let refund = product.refund_estimate(now).map_or_else(
        || "not cancellable".to_string(),
        |estimate| format!("refund now {}% ({})", estimate.percentage, estimate.amount),
    );
    writeln!(
        out,
        "    {:<14} {:<28} {:<10} {:>14}  service {}  {refund}",
        product.id,
        product.title,
        product.status,
        product.price.to_string(),
        product.service_date_time.format(TIMESTAMP),
    )
}

fn page_footer<W: Write>(out: &mut W, p: Pagination, shown: usize) -> io::Result<()> {
    writeln!(
        out,
        "\nPage {} of {} ({} orders total, {shown} shown)",
        p.page, p.total_pages, p.total
    )
}

fn status_summary<W: Write>(out: &mut W, counts: &StatusCounts) -> io::Result<()> {
    let parts: Vec<_> = OrderStatus::ALL
        .into_iter()
        .filter(|&status| counts.get(status) > 0)
        .map(|status| format!("{status}: {}", counts.get(status)))
        .collect();
    if parts.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", parts.join(", "))
}

pub fn orders<'a, W: Write>(
    out: &mut W,
    pagination: Pagination,
    visible: impl IntoIterator<Item = &'a Order>,
    counts: &StatusCounts,
) -> io::Result<()> {
    let mut shown = 0;
    for order in visible {
        order_line(out, order)?;
        shown += 1;
    }
    if shown == 0 {
        writeln!(out, "No orders found")?;
    }
    page_footer(out, pagination, shown)?;
    status_summary(out, counts)
}

pub fn orders_with_products<W: Write>(
    out: &mut W,
    page: &OrderPage<OrderWithProducts>,
    search: Option<&str>,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let mut shown = 0;
    for joined in &page.orders {
        if !joined.order.matches_search(search.unwrap_or_default()) {
            continue;
        }
        order_line(out, &joined.order)?;
        for product in &joined.products {
            product_line(out, product, now)?;
        }
        shown += 1;
    }
    if shown == 0 {
        writeln!(out, "No orders found")?;
    }
    page_footer(out, page.pagination, shown)?;
    status_summary(out, &StatusCounts::tally(page.orders.iter().map(|j| &j.order)))
}

pub fn order_detail<W: Write>(
    out: &mut W,
    joined: &OrderWithProducts,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let order = &joined.order;
    writeln!(out, "Order {} (PNR {})", order.id, order.pnr)?;
    writeln!(out, "  Status:   {}", order.status)?;
    writeln!(
        out,
        "  Customer: {} <{}>",
        order.customer.full_name(),
        order.customer.email
    )?;
    if let Some(total) = order.total() {
        writeln!(out, "  Total:    {total}")?;
    }
    for segment in &order.segments {
        writeln!(
            out,
            "  Flight:   {} {} -> {} departs {}",
            segment.flight_number,
            segment.departure,
            segment.arrival,
            segment.departure_time.format(TIMESTAMP),
        )?;
    }
    if let Some(notes) = &order.notes {
        writeln!(out, "  Notes:    {notes}")?;
    }
    let cancellable = joined.cancellable_products().count();
    writeln!(
        out,
        "  Products: {} ({cancellable} cancellable)",
        joined.products.len()
    )?;
    for product in &joined.products {
        product_line(out, product, now)?;
        for window in &product.cancellation_policy.windows {
            writeln!(
                out,
                "      {}h before service: {}% refund {}",
                window.hours_before_service, window.refund_percentage, window.description
            )?;
        }
    }
    Ok(())
}

fn webhook_line<W: Write>(out: &mut W, webhook: &Webhook) -> io::Result<()> {
    writeln!(
        out,
        "{:<26} {:<32} {:<8} {}  ({} events)",
        webhook.id,
        webhook.name,
        if webhook.is_active { "active" } else { "inactive" },
        webhook.url,
        webhook.events.len(),
    )
}

pub fn webhooks<W: Write>(out: &mut W, webhooks: &[Webhook]) -> io::Result<()> {
    if webhooks.is_empty() {
        return writeln!(out, "No webhooks configured");
    }
    webhooks.iter().try_for_each(|webhook| webhook_line(out, webhook))
}

pub fn webhook_detail<W: Write>(out: &mut W, webhook: &Webhook) -> io::Result<()> {
    writeln!(out, "Webhook {} ({})", webhook.id, webhook.name)?;
    writeln!(out, "  URL:     {}", webhook.url)?;
    writeln!(out, "  Active:  {}", webhook.is_active)?;
    writeln!(out, "  Events:  {}", webhook.events.join(", "))?;
    if let Some(headers) = &webhook.headers {
        for (name, value) in headers {
            writeln!(out, "  Header:  {name}: {value}")?;
        }
    }
    writeln!(
        out,
        "  Secret:  {}",
        if webhook.secret.is_some() { "set" } else { "none" }
    )?;
    let retry = webhook.retry_config;
    writeln!(
        out,
        "  Retry:   {} attempts, {} ms initial delay, x{} backoff",
        retry.max_retries, retry.retry_delay, retry.backoff_multiplier
    )?;
    writeln!(
        out,
        "  Created: {} by {}",
        webhook.created_at.format(TIMESTAMP),
        webhook.created_by
    )
}

pub fn test_result<W: Write>(out: &mut W, result: &TestWebhookResult) -> io::Result<()> {
    if result.success {
        let status = result
            .status_code
            .map_or_else(|| "-".to_string(), |code| code.to_string());
        let time = result
            .response_time
            .map_or_else(|| "-".to_string(), |ms| format!("{ms}ms"));
        writeln!(out, "Webhook test successful (status {status}, response time {time})")
    } else {
        writeln!(
            out,
            "Webhook test failed: {}",
            result.error_message.as_deref().unwrap_or("no reason given")
        )
    }
}

pub fn deliveries<W: Write>(out: &mut W, deliveries: &[WebhookDelivery]) -> io::Result<()> {
    if deliveries.is_empty() {
        return writeln!(out, "No deliveries yet");
    }
    for delivery in deliveries {
        write!(
            out,
            "{:<26} {:<24} {:<10} attempts {:<3} {}",
            delivery.id,
            delivery.event_type,
            delivery.status,
            delivery.attempts,
            delivery.created_at.format(TIMESTAMP),
        )?;
        match &delivery.error_message {
            Some(error) => writeln!(out, "  error: {error}")?,
            None => writeln!(out)?,
        }
    }
    Ok(())
}

pub fn stats<W: Write>(out: &mut W, stats: &WebhookStats) -> io::Result<()> {
    writeln!(
        out,
        "Webhooks:   {} ({} active)",
        stats.total_webhooks, stats.active_webhooks
    )?;
    writeln!(
        out,
        "Deliveries: {} ({} delivered, {} failed)",
        stats.total_deliveries, stats.successful_deliveries, stats.failed_deliveries
    )?;
    if let Some(rate) = stats.success_rate() {
        writeln!(out, "Success:    {rate:.1}%")?;
    }
    writeln!(out, "Avg time:   {:.0} ms", stats.average_response_time)
}
