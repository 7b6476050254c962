//! HTML email rendering
//!
//! Pure string formatting with a fixed inline-style layout. All interpolated
//! fields are HTML-escaped before they reach the markup.

use crate::types::Priority;

/// Escape special characters for HTML interpolation
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const FOOTER: &str = "\
        <div class=\"footer\">\n\
          <p>Sistem Informasi Agenda Protokoler</p>\n\
          <p>Email ini dikirim secara otomatis. Jangan balas email ini.</p>\n\
        </div>";

/// Render the new-agenda announcement email
pub fn render_agenda_email(
    agenda_title: &str,
    event_date: &str,
    event_location: &str,
    organizer: &str,
    description: &str,
) -> String {
    let title = escape_html(agenda_title);
    let date = escape_html(event_date);
    let location = escape_html(event_location);
    let organizer = escape_html(organizer);
    let description = escape_html(description);

    format!(
        "<!DOCTYPE html>\n\
        <html>\n\
        <head>\n\
          <meta charset=\"UTF-8\">\n\
          <style>\n\
            body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; color: #1a1a1a; }}\n\
            .container {{ max-width: 600px; margin: 0 auto; padding: 20px; background-color: #ffffff; border: 1px solid #d0d0d0; }}\n\
            .header {{ border-bottom: 2px solid #2c5282; padding-bottom: 10px; margin-bottom: 20px; }}\n\
            .header h1 {{ color: #2c5282; margin: 0; font-size: 20px; }}\n\
            .field {{ margin: 15px 0; }}\n\
            .field-label {{ color: #718096; font-weight: bold; text-transform: uppercase; font-size: 12px; }}\n\
            .field-value {{ color: #1a1a1a; margin-top: 5px; font-size: 14px; }}\n\
            .footer {{ border-top: 1px solid #d0d0d0; padding-top: 10px; margin-top: 20px; font-size: 12px; color: #718096; }}\n\
          </style>\n\
        </head>\n\
        <body>\n\
          <div class=\"container\">\n\
            <div class=\"header\">\n\
              <h1>AGENDA BARU</h1>\n\
            </div>\n\
            <div class=\"content\">\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Judul Agenda</div>\n\
                <div class=\"field-value\">{title}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Tanggal &amp; Waktu</div>\n\
                <div class=\"field-value\">{date}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Lokasi</div>\n\
                <div class=\"field-value\">{location}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Penyelenggara</div>\n\
                <div class=\"field-value\">{organizer}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Deskripsi</div>\n\
                <div class=\"field-value\">{description}</div>\n\
              </div>\n\
            </div>\n\
        {FOOTER}\n\
          </div>\n\
        </body>\n\
        </html>"
    )
}

/// Render the approval-needed email for a disposition
pub fn render_disposition_email(
    document_title: &str,
    document_number: &str,
    priority: Priority,
    due_date: &str,
    description: &str,
) -> String {
    let priority_color = match priority {
        Priority::Urgent => "#c53030",
        Priority::High => "#dd6b20",
        _ => "#b7791f",
    };

    let title = escape_html(document_title);
    let number = escape_html(document_number);
    let due = escape_html(due_date);
    let description = escape_html(description);
    let priority_label = priority.as_str().to_uppercase();

    format!(
        "<!DOCTYPE html>\n\
        <html>\n\
        <head>\n\
          <meta charset=\"UTF-8\">\n\
          <style>\n\
            body {{ font-family: Arial, sans-serif; background-color: #f4f4f4; color: #1a1a1a; }}\n\
            .container {{ max-width: 600px; margin: 0 auto; padding: 20px; background-color: #ffffff; border: 1px solid #d0d0d0; }}\n\
            .header {{ border-bottom: 2px solid #2c5282; padding-bottom: 10px; margin-bottom: 20px; }}\n\
            .header h1 {{ color: #2c5282; margin: 0; font-size: 20px; }}\n\
            .priority {{ display: inline-block; background-color: {priority_color}; color: #ffffff; padding: 5px 10px; font-weight: bold; text-transform: uppercase; font-size: 12px; margin-top: 10px; }}\n\
            .field {{ margin: 15px 0; }}\n\
            .field-label {{ color: #718096; font-weight: bold; text-transform: uppercase; font-size: 12px; }}\n\
            .field-value {{ color: #1a1a1a; margin-top: 5px; font-size: 14px; }}\n\
            .footer {{ border-top: 1px solid #d0d0d0; padding-top: 10px; margin-top: 20px; font-size: 12px; color: #718096; }}\n\
          </style>\n\
        </head>\n\
        <body>\n\
          <div class=\"container\">\n\
            <div class=\"header\">\n\
              <h1>DISPOSISI MEMERLUKAN APPROVAL</h1>\n\
            </div>\n\
            <div class=\"content\">\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Judul Dokumen</div>\n\
                <div class=\"field-value\">{title}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Nomor Dokumen</div>\n\
                <div class=\"field-value\">{number}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Prioritas</div>\n\
                <div class=\"priority\">{priority_label}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Deadline</div>\n\
                <div class=\"field-value\">{due}</div>\n\
              </div>\n\
              <div class=\"field\">\n\
                <div class=\"field-label\">Deskripsi</div>\n\
                <div class=\"field-value\">{description}</div>\n\
              </div>\n\
            </div>\n\
        {FOOTER}\n\
          </div>\n\
        </body>\n\
        </html>"
    )
}
