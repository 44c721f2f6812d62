use std::sync::Arc;

/// Slice of a uniform page handed out by [`UniformBufferAllocator`]
pub struct Allocation<'a> {
    /// The page holding the data
    pub buffer: &'a wgpu::Buffer,
    /// Byte offset within the page, usable as a dynamic offset
    pub offset: u64,
    /// Index of the page, stable for the allocator's lifetime
    pub page_index: usize,
}

/// Per-frame uniform storage carved out of large pages.
///
/// Every draw of a frame writes its uniforms into the current page at the
/// next aligned offset; a new page is created when one fills up. `reset` at
/// the start of a frame rewinds to the first page so pages are reused.
pub struct UniformBufferAllocator {
    device: Arc<wgpu::Device>,
    label: String,
    page_size: u64,
    alignment: u64,
    pages: Vec<wgpu::Buffer>,
    current_page: usize,
    current_offset: u64,
}

impl UniformBufferAllocator {
    /// Create an allocator with 64KB pages
    pub fn new(device: Arc<wgpu::Device>, label: &str) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        Self {
            device,
            label: label.to_string(),
            page_size: 65536,
            alignment,
            pages: Vec::new(),
            current_page: 0,
            current_offset: 0,
        }
    }

    /// Rewind for a new frame
    pub fn reset(&mut self) {
        self.current_page = 0;
        self.current_offset = 0;
    }

    /// Offset alignment between allocations
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Pages created so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write `content` to the next free slot
    pub fn allocate(&mut self, queue: &wgpu::Queue, content: &[u8]) -> Allocation<'_> {
        let size = content.len() as u64;
        let padded_size = (size + self.alignment - 1) & !(self.alignment - 1);

        loop {
            match self.pages.get(self.current_page) {
                Some(page) if self.current_offset + size <= page.size() => break,
                Some(_) => {
                    self.current_page += 1;
                    self.current_offset = 0;
                }
                None => {
                    let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("{} Page {}", self.label, self.pages.len())),
                        size: self.page_size.max(padded_size * 2),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    });
                    self.pages.push(buffer);
                }
            }
        }

        let page_index = self.current_page;
        let offset = self.current_offset;
        let buffer = &self.pages[page_index];
        queue.write_buffer(buffer, offset, content);
        self.current_offset += padded_size;

        Allocation {
            buffer,
            offset,
            page_index,
        }
    }
}
