// ABOUTME: Cleanup utility for the remote page tree
// ABOUTME: Deletes every child page under the configured root page

use crate::api::NotionClient;
use crate::Result;

/// Delete all child pages of the root page. Deleting a page removes its
/// descendants with it, so one level is enough to clear the tree.
/// Individual delete failures are reported and tolerated; the count of
/// successfully deleted pages is returned.
pub fn clean_all(client: &NotionClient, root_page_id: &str) -> Result<usize> {
    let children = client.list_child_pages(root_page_id)?;
    let mut deleted = 0;

    for child in children {
        println!("deleting: {}", child.title);
        match client.delete_block(&child.id) {
            Ok(()) => deleted += 1,
            Err(e) => eprintln!("failed to delete {}: {}", child.title, e),
        }
    }

    Ok(deleted)
}
